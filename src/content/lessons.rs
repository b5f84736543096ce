use super::read_embedded;
use crate::config::WordLanguage;
use crate::error::{KetikError, Result};
use crate::session::SessionResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    pub en: String,
    pub id: String,
}

impl Instructions {
    pub fn get(&self, language: WordLanguage) -> &str {
        match language {
            WordLanguage::En => &self.en,
            WordLanguage::Id => &self.id,
        }
    }
}

/// One sublevel of the course. Static data, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    pub level: u8,
    pub sublevel: u8,
    pub title: String,
    pub description: String,
    pub text: String,
    pub target_wpm: u32,
    pub min_accuracy: u32,
    pub focus_keys: Vec<String>,
    pub instructions: Instructions,
}

impl LessonContent {
    /// Both the speed and accuracy targets were reached
    pub fn targets_met(&self, result: &SessionResult) -> bool {
        result.wpm >= self.target_wpm && result.accuracy >= self.min_accuracy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: u8,
    pub name_en: &'static str,
    pub name_id: &'static str,
    pub description_en: &'static str,
    pub description_id: &'static str,
}

impl LevelInfo {
    pub fn name(&self, language: WordLanguage) -> &'static str {
        match language {
            WordLanguage::En => self.name_en,
            WordLanguage::Id => self.name_id,
        }
    }

    pub fn description(&self, language: WordLanguage) -> &'static str {
        match language {
            WordLanguage::En => self.description_en,
            WordLanguage::Id => self.description_id,
        }
    }
}

const LEVEL_INFO: [LevelInfo; 5] = [
    LevelInfo {
        level: 1,
        name_en: "Basic Fingers",
        name_id: "Dasar Jemari",
        description_en: "Master home row positioning",
        description_id: "Kuasai posisi home row",
    },
    LevelInfo {
        level: 2,
        name_en: "Top & Bottom Combination",
        name_id: "Kombinasi Atas & Bawah",
        description_en: "Full alphabet integration",
        description_id: "Integrasi alfabet lengkap",
    },
    LevelInfo {
        level: 3,
        name_en: "Keyboard Mastery",
        name_id: "Penguasaan Keyboard",
        description_en: "Numbers and symbols",
        description_id: "Angka dan simbol",
    },
    LevelInfo {
        level: 4,
        name_en: "Improving Efficiency",
        name_id: "Meningkatkan Efisiensi",
        description_en: "Real-world text practice",
        description_id: "Latihan teks dunia nyata",
    },
    LevelInfo {
        level: 5,
        name_en: "Speed Master",
        name_id: "Master Kecepatan",
        description_en: "Advanced content mastery",
        description_id: "Penguasaan konten lanjutan",
    },
];

/// Read-only lesson lookup
#[derive(Debug, Clone, Default)]
pub struct LessonLibrary {
    lessons: Vec<LessonContent>,
}

impl LessonLibrary {
    pub fn embedded() -> Result<Self> {
        let lessons: Vec<LessonContent> = read_embedded("lessons.json")?;
        Ok(Self::from_lessons(lessons))
    }

    pub fn from_lessons(mut lessons: Vec<LessonContent>) -> Self {
        lessons.sort_by_key(|l| (l.level, l.sublevel));
        Self { lessons }
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn lesson(&self, level: u8, sublevel: u8) -> Option<&LessonContent> {
        self.lessons
            .iter()
            .find(|l| l.level == level && l.sublevel == sublevel)
    }

    /// Like [`lesson`](Self::lesson) but a miss is an error
    pub fn require_lesson(&self, level: u8, sublevel: u8) -> Result<&LessonContent> {
        self.lesson(level, sublevel)
            .ok_or(KetikError::LessonNotFound { level, sublevel })
    }

    /// Lessons of one level in sublevel order. Empty for unknown levels.
    pub fn level_lessons(&self, level: u8) -> Vec<&LessonContent> {
        self.lessons.iter().filter(|l| l.level == level).collect()
    }

    pub fn level_info(level: u8) -> Option<LevelInfo> {
        LEVEL_INFO.iter().find(|info| info.level == level).copied()
    }

    pub fn require_level_info(level: u8) -> Result<LevelInfo> {
        Self::level_info(level).ok_or(KetikError::LevelNotFound(level))
    }
}
