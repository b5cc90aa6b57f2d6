mod catalog;
mod draft;
mod ids;
mod language;
mod lesson;
mod summary;
mod trivia;

pub use catalog::{CATALOG, CatalogEntry, Difficulty, find_entry};
pub use draft::{
    DraftError, LineDraft, OVERLAP_THRESHOLD_SECS, check_alternatives, check_overlap,
    find_overlap, sort_drafts,
};
pub use ids::{LessonKey, OptionId};
pub use language::{LANGUAGES, Language};
pub use lesson::{Alternative, Lesson, LessonError, Line, Segment};
pub use summary::{LessonSummary, Score, SummaryError, round2};
pub use trivia::{TriviaSegment, split_trivia};
