use async_trait::async_trait;
use lingo_core::model::{Lesson, LessonError, LessonKey};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::fs::DirectoryRepository;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("invalid lesson key `{0}`")]
    InvalidKey(String),

    #[error("repository is read-only")]
    ReadOnly,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid lesson: {0}")]
    InvalidLesson(#[from] LessonError),
}

/// Repository contract for lesson files.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Fetch and validate a lesson by key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_lesson(&self, key: &LessonKey) -> Result<Lesson, StorageError>;

    /// Persist or replace a lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lesson cannot be stored.
    async fn save_lesson(&self, key: &LessonKey, lesson: &Lesson) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    lessons: Arc<Mutex<HashMap<LessonKey, Lesson>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lessons: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Repository pre-populated with `lessons`.
    #[must_use]
    pub fn with_lessons(lessons: impl IntoIterator<Item = (LessonKey, Lesson)>) -> Self {
        Self {
            lessons: Arc::new(Mutex::new(lessons.into_iter().collect())),
        }
    }
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn get_lesson(&self, key: &LessonKey) -> Result<Lesson, StorageError> {
        let guard = self
            .lessons
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(key).cloned().ok_or(StorageError::NotFound)
    }

    async fn save_lesson(&self, key: &LessonKey, lesson: &Lesson) -> Result<(), StorageError> {
        lesson.validate()?;
        let mut guard = self
            .lessons
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.clone(), lesson.clone());
        Ok(())
    }
}

/// Lesson repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub lessons: Arc<dyn LessonRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            lessons: Arc::new(InMemoryRepository::new()),
        }
    }

    /// Lessons served from `<root>/songs/<key>.json`.
    #[must_use]
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self {
            lessons: Arc::new(DirectoryRepository::new(root)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::model::Line;

    fn build_lesson(lines: usize) -> Lesson {
        let lines = (0..lines)
            .map(|i| {
                let start = i as f64 * 5.0;
                Line::new("bn", format!("line {i}"), vec!["w".into()], start, start + 4.0)
            })
            .collect();
        Lesson::new("Demo", "abc", lines).unwrap()
    }

    #[tokio::test]
    async fn round_trips_lesson() {
        let repo = InMemoryRepository::new();
        let key = LessonKey::new("demo");
        repo.save_lesson(&key, &build_lesson(2)).await.unwrap();

        let fetched = repo.get_lesson(&key).await.unwrap();
        assert_eq!(fetched.line_count(), 2);
        assert_eq!(fetched.name(), "Demo");
    }

    #[tokio::test]
    async fn missing_lesson_is_not_found() {
        let storage = Storage::in_memory();
        let err = storage
            .lessons
            .get_lesson(&LessonKey::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
