use std::path::PathBuf;
use std::sync::Arc;

use lingo_core::shuffle::ShuffleSeed;
use storage::repository::{LessonRepository, Storage};

use crate::Clock;
use crate::authoring::{AnnotationEditor, PassthroughTransliterator};
use crate::config::PlayerConfig;
use crate::error::LessonServiceError;
use crate::remote::HttpLessonRepository;
use crate::sessions::{LessonActivity, LessonService};

/// Where lesson files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonSource {
    /// `<root>/songs/<id>.json` on disk.
    Directory(PathBuf),
    /// `<base>/songs/<id>.json` over HTTP.
    Http(String),
}

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    config: PlayerConfig,
    seed: ShuffleSeed,
    lessons: LessonService,
}

impl AppServices {
    /// # Errors
    ///
    /// Returns `LessonServiceError::InvalidBaseUrl` for a malformed HTTP base.
    pub fn new(
        source: &LessonSource,
        config: PlayerConfig,
        clock: Clock,
    ) -> Result<Self, LessonServiceError> {
        let repo: Arc<dyn LessonRepository> = match source {
            LessonSource::Directory(root) => Storage::directory(root.clone()).lessons,
            LessonSource::Http(base) => Arc::new(HttpLessonRepository::new(base)?),
        };
        Ok(Self {
            clock,
            config,
            seed: ShuffleSeed::Random,
            lessons: LessonService::new(repo),
        })
    }

    #[must_use]
    pub fn with_seed(mut self, seed: ShuffleSeed) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> ShuffleSeed {
        self.seed
    }

    #[must_use]
    pub fn lessons(&self) -> &LessonService {
        &self.lessons
    }

    #[must_use]
    pub fn lesson_activity(&self) -> LessonActivity {
        LessonActivity::new(self.lessons.clone())
    }

    #[must_use]
    pub fn annotation_editor(&self) -> AnnotationEditor {
        AnnotationEditor::new(Arc::new(PassthroughTransliterator))
    }
}
