/// A language the authoring tool can record and transliterate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// BCP-47 locale handed to the speech recognizer.
    pub code: &'static str,
    pub name: &'static str,
    /// Source script for transliteration.
    pub script: &'static str,
    /// Whether browsers ship a recognizer voice for the locale.
    pub voice: bool,
}

pub const LANGUAGES: &[Language] = &[
    Language { code: "bn-IN", name: "Bengali", script: "bengali", voice: true },
    Language { code: "ta-IN", name: "Tamil", script: "tamil", voice: true },
    Language { code: "mr-IN", name: "Marathi", script: "devanagari", voice: true },
    Language { code: "te-IN", name: "Telugu", script: "telugu", voice: true },
    Language { code: "ml-IN", name: "Malayalam", script: "malayalam", voice: true },
    Language { code: "ne-NP", name: "Nepali", script: "devanagari", voice: true },
    Language { code: "hi-IN", name: "Hindi", script: "devanagari", voice: true },
    Language { code: "gu-IN", name: "Gujarati", script: "gujarati", voice: true },
    Language { code: "kn-IN", name: "Kannada", script: "kannada", voice: true },
    Language { code: "pa-IN", name: "Punjabi", script: "gurmukhi", voice: false },
    Language { code: "or-IN", name: "Odia", script: "oriya", voice: false },
    Language { code: "as-IN", name: "Assamese", script: "assamese", voice: false },
    Language { code: "mai-IN", name: "Maithili", script: "tirhuta_maithili", voice: false },
    Language { code: "bho-IN", name: "Bhojpuri", script: "devanagari", voice: false },
    Language { code: "awa-IN", name: "Awadhi", script: "devanagari", voice: false },
    Language { code: "kok-IN", name: "Konkani", script: "devanagari", voice: false },
    Language { code: "tcy-IN", name: "Tulu", script: "kannada", voice: false },
    Language { code: "sa-IN", name: "Sanskrit", script: "devanagari", voice: false },
    Language { code: "si-LK", name: "Sinhala", script: "sinhala", voice: true },
    Language { code: "ur-IN", name: "Urdu", script: "urdu", voice: true },
    Language { code: "sd-IN", name: "Sindhi", script: "devanagari", voice: false },
    Language { code: "brx-IN", name: "Bodo", script: "devanagari", voice: false },
    Language { code: "sat-IN", name: "Santali", script: "ol_chiki", voice: false },
];

impl Language {
    /// Look up a language by locale code.
    #[must_use]
    pub fn by_code(code: &str) -> Option<Self> {
        LANGUAGES.iter().copied().find(|lang| lang.code == code)
    }

    /// Look up a language by display name, ignoring case.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Language {
    fn default() -> Self {
        LANGUAGES[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_bengali() {
        assert_eq!(Language::default().code, "bn-IN");
        assert_eq!(LANGUAGES.len(), 23);
    }

    #[test]
    fn lookups_by_code_and_name() {
        assert_eq!(Language::by_code("mr-IN").unwrap().script, "devanagari");
        assert_eq!(Language::by_name("marathi").unwrap().code, "mr-IN");
        assert!(Language::by_code("xx-YY").is_none());
    }
}
