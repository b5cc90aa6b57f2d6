//! Lesson files on disk, laid out as `<root>/songs/<key>.json`.

use async_trait::async_trait;
use lingo_core::model::{Lesson, LessonKey};
use std::io;
use std::path::{Path, PathBuf};

use crate::lesson_file;
use crate::repository::{LessonRepository, StorageError};

#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    root: PathBuf,
}

impl DirectoryRepository {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the lesson file for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for a key that would resolve outside `songs/`.
    pub fn path_for(&self, key: &LessonKey) -> Result<PathBuf, StorageError> {
        if !key.is_path_safe() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key.file_path()))
    }

    /// Write `lesson` into `dir` under its export file name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory or file cannot be written.
    pub async fn write_export(dir: &Path, lesson: &Lesson) -> Result<PathBuf, StorageError> {
        let path = dir.join(lesson_file::export_file_name(lesson));
        write_file(&path, &lesson_file::encode(lesson)?).await?;
        Ok(path)
    }
}

#[async_trait]
impl LessonRepository for DirectoryRepository {
    async fn get_lesson(&self, key: &LessonKey) -> Result<Lesson, StorageError> {
        let json = tokio::fs::read_to_string(self.path_for(key)?)
            .await
            .map_err(map_io)?;
        lesson_file::decode(&json)
    }

    async fn save_lesson(&self, key: &LessonKey, lesson: &Lesson) -> Result<(), StorageError> {
        lesson.validate()?;
        write_file(&self.path_for(key)?, &lesson_file::encode(lesson)?).await
    }
}

async fn write_file(path: &Path, contents: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(map_io)?;
    }
    tokio::fs::write(path, contents).await.map_err(map_io)
}

fn map_io(err: io::Error) -> StorageError {
    if err.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound
    } else {
        StorageError::Io(err.to_string())
    }
}
