use lingo_core::model::Language;

/// Converts native-script text into Latin transliteration.
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, text: &str, language: &Language) -> String;
}

/// Returns the input unchanged. Used when no transliteration engine is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTransliterator;

impl Transliterator for PassthroughTransliterator {
    fn transliterate(&self, text: &str, _language: &Language) -> String {
        text.to_owned()
    }
}

/// Lowercase and drop the first `.`, as transliteration output is stored.
#[must_use]
pub fn clean_transliteration(raw: &str) -> String {
    raw.to_lowercase().replacen('.', "", 1)
}
