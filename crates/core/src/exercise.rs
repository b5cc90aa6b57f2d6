//! Word-ordering exercise for a single line.
//!
//! The learner picks shuffled word options one by one to build an ordered
//! selection, then submits it for judging against the line's accepted orders.

use thiserror::Error;

use crate::model::{Line, OptionId};
use crate::shuffle::ShuffleSeed;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("selection has {selected} of {required} words")]
    IncompleteSelection { selected: usize, required: usize },

    #[error("exercise already solved")]
    AlreadySolved,
}

/// One selectable word. Duplicate words get distinct ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOption {
    id: OptionId,
    text: String,
}

impl WordOption {
    #[must_use]
    pub fn id(&self) -> OptionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Transient cue handed to the front-end after a submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

impl Feedback {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Correct => "Correct!",
            Self::Incorrect => "Let's try again!",
        }
    }

    /// Sound effect played alongside the message.
    #[must_use]
    pub fn sound(self) -> &'static str {
        match self {
            Self::Correct => "/correct.mp3",
            Self::Incorrect => "/wrong.mp3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExercisePhase {
    /// Accepting selections and submits.
    Arranging,
    /// Solved; waiting for the learner to acknowledge the trivia.
    ShowingTrivia,
    /// Solved and acknowledged.
    Solved,
}

/// Result of judging a submitted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Incorrect,
    /// Correct; the line is complete once `trivia` (if any) is acknowledged.
    Correct { trivia: Option<String> },
}

impl Verdict {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct { .. })
    }

    #[must_use]
    pub fn feedback(&self) -> Feedback {
        if self.is_correct() {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        }
    }
}

/// Per-line exercise state. Rebuilt whenever the current line changes.
#[derive(Debug, Clone)]
pub struct Exercise {
    line: Line,
    options: Vec<WordOption>,
    selected: Vec<OptionId>,
    phase: ExercisePhase,
}

impl Exercise {
    /// Build the shuffled option pool for `line`.
    ///
    /// `salt` distinguishes lines when `seed` is fixed.
    #[must_use]
    pub fn new(line: &Line, seed: ShuffleSeed, salt: u64) -> Self {
        let mut options: Vec<WordOption> = line
            .correct_order()
            .iter()
            .enumerate()
            .map(|(index, text)| WordOption {
                id: OptionId::new(index),
                text: text.clone(),
            })
            .collect();
        seed.shuffle(salt, &mut options);

        Self {
            line: line.clone(),
            options,
            selected: Vec::new(),
            phase: ExercisePhase::Arranging,
        }
    }

    #[must_use]
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// The option pool in display (shuffled) order.
    #[must_use]
    pub fn options(&self) -> &[WordOption] {
        &self.options
    }

    #[must_use]
    pub fn phase(&self) -> ExercisePhase {
        self.phase
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.phase == ExercisePhase::Solved
    }

    #[must_use]
    pub fn is_selected(&self, id: OptionId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected options in selection order.
    #[must_use]
    pub fn selection(&self) -> Vec<&WordOption> {
        self.selected
            .iter()
            .filter_map(|id| self.option(*id))
            .collect()
    }

    /// Selected words in selection order.
    #[must_use]
    pub fn selected_words(&self) -> Vec<&str> {
        self.selection().into_iter().map(WordOption::text).collect()
    }

    /// Options not yet selected, in display order.
    #[must_use]
    pub fn available(&self) -> Vec<&WordOption> {
        self.options
            .iter()
            .filter(|option| !self.is_selected(option.id))
            .collect()
    }

    /// Submission is possible once every word has been placed.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.phase == ExercisePhase::Arranging
            && self.selected.len() == self.line.correct_order().len()
    }

    /// Append an option to the selection. No-op for unknown or already selected ids.
    pub fn select(&mut self, id: OptionId) -> bool {
        if self.phase != ExercisePhase::Arranging
            || self.option(id).is_none()
            || self.is_selected(id)
        {
            return false;
        }
        self.selected.push(id);
        true
    }

    /// Select the first available option whose text is `word`.
    pub fn select_word(&mut self, word: &str) -> bool {
        let id = self
            .available()
            .into_iter()
            .find(|option| option.text == word)
            .map(WordOption::id);
        id.is_some_and(|id| self.select(id))
    }

    /// Return the most recently selected option to the pool.
    pub fn remove_last(&mut self) -> Option<OptionId> {
        if self.phase != ExercisePhase::Arranging {
            return None;
        }
        self.selected.pop()
    }

    /// Return the option at `position` in the selection to the pool.
    pub fn remove_at(&mut self, position: usize) -> Option<OptionId> {
        if self.phase != ExercisePhase::Arranging || position >= self.selected.len() {
            return None;
        }
        Some(self.selected.remove(position))
    }

    /// Judge the current selection.
    ///
    /// An incorrect verdict keeps the selection so the learner can fix it.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::AlreadySolved` after a correct submit and
    /// `ExerciseError::IncompleteSelection` while words are still unplaced.
    pub fn submit(&mut self) -> Result<Verdict, ExerciseError> {
        if self.phase != ExercisePhase::Arranging {
            return Err(ExerciseError::AlreadySolved);
        }
        let required = self.line.correct_order().len();
        if self.selected.len() != required {
            return Err(ExerciseError::IncompleteSelection {
                selected: self.selected.len(),
                required,
            });
        }

        if !self.line.accepts(&self.selected_words()) {
            return Ok(Verdict::Incorrect);
        }

        let trivia = self.line.trivia().map(str::to_owned);
        self.phase = if trivia.is_some() {
            ExercisePhase::ShowingTrivia
        } else {
            ExercisePhase::Solved
        };
        Ok(Verdict::Correct { trivia })
    }

    /// Dismiss the trivia shown after a correct submit.
    pub fn acknowledge_trivia(&mut self) -> bool {
        if self.phase != ExercisePhase::ShowingTrivia {
            return false;
        }
        self.phase = ExercisePhase::Solved;
        true
    }

    fn option(&self, id: OptionId) -> Option<&WordOption> {
        self.options.iter().find(|option| option.id == id)
    }
}
