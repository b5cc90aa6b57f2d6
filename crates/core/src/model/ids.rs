use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one word option inside an exercise.
///
/// The id is the token's position in the line's correct order, so two
/// identical tokens (for example the two "the" in a line) stay distinct.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionId(usize);

impl OptionId {
    /// Creates a new `OptionId`
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying position
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionId({})", self.0)
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of a lesson in the catalog, also the file stem under `songs/`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LessonKey(String);

impl LessonKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for a route's `id`, or `None` when it is blank or could name a
    /// path outside `songs/`.
    #[must_use]
    pub fn from_route(id: &str) -> Option<Self> {
        let key = Self::new(id.trim());
        (!key.0.is_empty() && key.is_path_safe()).then_some(key)
    }

    /// True when the key is a single file stem: no separators, no `..`.
    #[must_use]
    pub fn is_path_safe(&self) -> bool {
        !self.0.contains(['/', '\\']) && !self.0.contains("..")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative path of the lesson file served for this key.
    #[must_use]
    pub fn file_path(&self) -> String {
        format!("songs/{}.json", self.0)
    }
}

impl fmt::Debug for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonKey({})", self.0)
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
