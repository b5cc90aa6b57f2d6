//! The lesson authoring tool.

mod editor;
mod speech;
mod transliterate;

pub use editor::{AnnotationEditor, RecordingState, video_id_from_url};
pub use speech::{ScriptedRecognizer, SpeechEvent, SpeechRecognizer};
pub use transliterate::{PassthroughTransliterator, Transliterator, clean_transliteration};
