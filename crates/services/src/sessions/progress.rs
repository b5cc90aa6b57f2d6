use lingo_core::model::Score;
use lingo_core::progression::LessonPhase;

/// Aggregated view of lesson progress, useful for UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgress {
    pub phase: LessonPhase,
    pub line_index: Option<usize>,
    pub total_lines: usize,
    pub completed: Vec<bool>,
    pub completed_count: usize,
    /// `100 × completed / total`, rounded to two decimals.
    pub percent: f64,
    pub score: Score,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub can_submit: bool,
    pub advancing_to: Option<usize>,
    pub is_complete: bool,
}
