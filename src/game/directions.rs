use crate::config::{Difficulty, WordLanguage};

/// Movement vectors keyed by lowercase direction word. English and
/// Indonesian synonyms share a vector.
const DIRECTIONS: &[(&str, (i32, i32))] = &[
    ("up", (0, -1)),
    ("atas", (0, -1)),
    ("go", (0, -1)),
    ("walk", (0, -1)),
    ("jalan", (0, -1)),
    ("forward", (0, -1)),
    ("maju", (0, -1)),
    ("north", (0, -1)),
    ("utara", (0, -1)),
    ("advance", (0, -1)),
    ("melangkah", (0, -1)),
    ("straight", (0, -1)),
    ("lurus", (0, -1)),
    ("down", (0, 1)),
    ("bawah", (0, 1)),
    ("south", (0, 1)),
    ("selatan", (0, 1)),
    ("backward", (0, 1)),
    ("mundur", (0, 1)),
    ("retreat", (0, 1)),
    ("left", (-1, 0)),
    ("kiri", (-1, 0)),
    ("west", (-1, 0)),
    ("barat", (-1, 0)),
    ("right", (1, 0)),
    ("kanan", (1, 0)),
    ("east", (1, 0)),
    ("timur", (1, 0)),
    ("move", (1, 0)),
    ("gerak", (1, 0)),
    ("bergerak", (1, 0)),
    ("sideways", (1, 0)),
    ("menyamping", (1, 0)),
    ("run", (2, 0)),
    ("lari", (2, 0)),
    ("northeast", (1, -1)),
    ("timur-laut", (1, -1)),
    ("northwest", (-1, -1)),
    ("barat-laut", (-1, -1)),
    ("southeast", (1, 1)),
    ("tenggara", (1, 1)),
    ("diagonal", (1, 1)),
    ("southwest", (-1, 1)),
    ("barat-daya", (-1, 1)),
];

const EASY_EN: &[&str] = &["up", "down", "left", "right", "go", "move", "walk", "run"];
const EASY_ID: &[&str] = &["atas", "bawah", "kiri", "kanan", "jalan", "gerak", "lari", "maju"];
const MEDIUM_EN: &[&str] = &[
    "north", "south", "east", "west", "forward", "backward", "advance", "retreat",
];
const MEDIUM_ID: &[&str] = &[
    "utara", "selatan", "timur", "barat", "maju", "mundur", "melangkah", "bergerak",
];
const HARD_EN: &[&str] = &[
    "northeast",
    "northwest",
    "southeast",
    "southwest",
    "diagonal",
    "straight",
    "sideways",
];
const HARD_ID: &[&str] = &[
    "tenggara",
    "timur-laut",
    "barat-daya",
    "barat-laut",
    "diagonal",
    "lurus",
    "menyamping",
];

/// Case-insensitive lookup. Unknown words have no vector.
pub fn direction_vector(word: &str) -> Option<(i32, i32)> {
    let word = word.trim().to_lowercase();
    DIRECTIONS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, v)| *v)
}

pub fn word_pool(difficulty: Difficulty, language: WordLanguage) -> &'static [&'static str] {
    match (difficulty, language) {
        (Difficulty::Easy, WordLanguage::En) => EASY_EN,
        (Difficulty::Easy, WordLanguage::Id) => EASY_ID,
        (Difficulty::Medium, WordLanguage::En) => MEDIUM_EN,
        (Difficulty::Medium, WordLanguage::Id) => MEDIUM_ID,
        (Difficulty::Hard, WordLanguage::En) => HARD_EN,
        (Difficulty::Hard, WordLanguage::Id) => HARD_ID,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    #[test]
    fn synonyms_share_vectors() {
        assert_eq!(direction_vector("right"), direction_vector("kanan"));
        assert_eq!(direction_vector("up"), direction_vector("atas"));
        assert_eq!(direction_vector("southwest"), direction_vector("barat-daya"));
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(direction_vector("RIGHT"), Some((1, 0)));
        assert_eq!(direction_vector("Lari"), Some((2, 0)));
    }

    #[test]
    fn unknown_word_has_no_vector() {
        assert_eq!(direction_vector("sideways-ish"), None);
        assert_eq!(direction_vector(""), None);
    }

    #[test]
    fn every_pool_word_moves() {
        let difficulties = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
        let languages = [WordLanguage::En, WordLanguage::Id];
        for (d, l) in iproduct!(difficulties, languages) {
            let pool = word_pool(d, l);
            assert!(!pool.is_empty());
            for word in pool {
                assert!(direction_vector(word).is_some(), "{word} ({d}, {l})");
            }
        }
    }
}
