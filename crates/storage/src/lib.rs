#![forbid(unsafe_code)]

pub mod demo;
pub mod fs;
pub mod lesson_file;
pub mod repository;

pub use fs::DirectoryRepository;
pub use repository::{InMemoryRepository, LessonRepository, Storage, StorageError};
