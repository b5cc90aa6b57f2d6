use std::sync::Arc;

use lingo_core::Clock;
use lingo_core::model::{Lesson, LessonKey};
use lingo_core::shuffle::ShuffleSeed;
use storage::repository::LessonRepository;
use tracing::{error, info};

use super::service::LessonSession;
use crate::config::PlayerConfig;
use crate::error::LessonServiceError;

/// Loads lessons by catalog key.
#[derive(Clone)]
pub struct LessonService {
    lessons: Arc<dyn LessonRepository>,
}

impl LessonService {
    #[must_use]
    pub fn new(lessons: Arc<dyn LessonRepository>) -> Self {
        Self { lessons }
    }

    /// Fetch `songs/<key>.json`. Single attempt, no retry.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` when the lesson is missing or invalid.
    pub async fn load(&self, key: &LessonKey) -> Result<Lesson, LessonServiceError> {
        Ok(self.lessons.get_lesson(key).await?)
    }
}

/// Where the lesson page is in loading its lesson.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No lesson id was given.
    Idle,
    /// Fetch in flight, or failed.
    Loading,
    Ready(Box<Lesson>),
}

/// The lesson page: resolves the route's id to a lesson, then starts a session.
pub struct LessonActivity {
    service: LessonService,
    state: LoadState,
}

impl LessonActivity {
    #[must_use]
    pub fn new(service: LessonService) -> Self {
        Self {
            service,
            state: LoadState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn lesson(&self) -> Option<&Lesson> {
        match &self.state {
            LoadState::Ready(lesson) => Some(&**lesson),
            _ => None,
        }
    }

    /// Load the lesson for the route's `id`.
    ///
    /// A failed fetch, or an id that is not a plain file stem, is logged and
    /// leaves the activity in `Loading`.
    pub async fn open(&mut self, id: Option<&str>) -> &LoadState {
        let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
            self.state = LoadState::Idle;
            return &self.state;
        };
        self.state = LoadState::Loading;
        let Some(key) = LessonKey::from_route(id) else {
            error!(id, "invalid lesson id");
            return &self.state;
        };

        match self.service.load(&key).await {
            Ok(lesson) => {
                info!(%key, lines = lesson.line_count(), "lesson loaded");
                self.state = LoadState::Ready(Box::new(lesson));
            }
            Err(err) => error!(%key, error = %err, "failed to load lesson"),
        }
        &self.state
    }

    /// Start a session on the loaded lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::MissingId` until a lesson is ready, and
    /// `LessonServiceError::Session` if the session cannot start.
    pub fn start_session(
        &self,
        config: &PlayerConfig,
        seed: ShuffleSeed,
        clock: Clock,
    ) -> Result<LessonSession, LessonServiceError> {
        let lesson = self.lesson().ok_or(LessonServiceError::MissingId)?;
        Ok(LessonSession::new(lesson.clone(), config, seed, clock)?)
    }
}
