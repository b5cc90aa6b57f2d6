#![forbid(unsafe_code)]

pub mod app_services;
pub mod authoring;
pub mod config;
pub mod error;
pub mod player;
pub mod remote;
pub mod sessions;

pub use lingo_core::Clock;
pub use sessions as session;

pub use app_services::{AppServices, LessonSource};
pub use config::{DeviceClass, PlayerConfig, StopStrategyKind};
pub use error::{AuthoringError, ConfigError, LessonServiceError, SessionError, SpeechError};
pub use player::{SegmentPlayer, SimulatedVideo, VideoHost};
pub use sessions::{
    LessonActivity, LessonService, LessonSession, LoadState, SessionEvent, SessionMessage,
    SessionProgress, SubmitOutcome,
};
