use crate::model::LessonKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// One song on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub video_id: &'static str,
    pub difficulty: Difficulty,
    pub language: Option<&'static str>,
}

impl CatalogEntry {
    #[must_use]
    pub fn lesson_key(&self) -> LessonKey {
        LessonKey::new(self.key)
    }

    #[must_use]
    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/mqdefault.jpg", self.video_id)
    }

    /// Route that runs this lesson.
    #[must_use]
    pub fn route(&self) -> String {
        format!("/song?id={}", self.key)
    }
}

const fn entry(
    key: &'static str,
    title: &'static str,
    video_id: &'static str,
    difficulty: Difficulty,
) -> CatalogEntry {
    CatalogEntry {
        key,
        title,
        video_id,
        difficulty,
        language: None,
    }
}

pub const CATALOG: &[CatalogEntry] = &[
    entry("jamini", "Aami Jamini, Tumi Soshi He", "NUu7xUxYnn0", Difficulty::Medium),
    entry("porano", "Amaro Porano Jaha Chay", "_69QcJf0LLU", Difficulty::Medium),
    entry("maati", "Banglar Mati Banglar Jol", "OKGTug10PyE", Difficulty::Easy),
    entry("tomarsonge", "Tomar Songe Bedhechi Amar Pran", "sFdDxKaGzs8", Difficulty::Medium),
    entry("boshonto", "Boshonto Eshe Geche", "HohBnpGUllc", Difficulty::Hard),
    entry("bandhibi", "Amar Haath Bandhibi", "PA7DKlXCYdU", Difficulty::Easy),
    entry("ekla", "Ekla Cholo Re", "i5hQ6yBfZRE", Difficulty::Medium),
    CatalogEntry {
        key: "kajal",
        title: "Gulabi Sadi",
        video_id: "B_6d3RBiEN0",
        difficulty: Difficulty::Medium,
        language: Some("Marathi"),
    },
];

#[must_use]
pub fn find_entry(key: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.key == key)
}
