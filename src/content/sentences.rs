use super::read_embedded;
use crate::config::Difficulty;
use crate::error::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

/// Difficulty-tiered sentences for the sentence race
#[derive(Debug, Clone, Deserialize)]
pub struct SentencePool {
    pub easy: Vec<String>,
    pub medium: Vec<String>,
    pub hard: Vec<String>,
}

impl SentencePool {
    pub fn embedded() -> Result<Self> {
        read_embedded("sentences.json")
    }

    pub fn tier(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Draws with replacement, so repeats are possible
    pub fn pick<R: Rng + ?Sized>(&self, difficulty: Difficulty, rng: &mut R) -> Option<&str> {
        self.tier(difficulty).choose(rng).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn tiers_are_populated() {
        let pool = SentencePool::embedded().unwrap();
        assert_eq!(pool.tier(Difficulty::Easy).len(), 4);
        assert_eq!(pool.tier(Difficulty::Medium).len(), 3);
        assert_eq!(pool.tier(Difficulty::Hard).len(), 2);
    }

    #[test]
    fn pick_stays_in_tier() {
        let pool = SentencePool::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let s = pool.pick(Difficulty::Hard, &mut rng).unwrap();
            assert!(pool.hard.iter().any(|h| h == s));
        }
    }

    #[test]
    fn empty_tier_yields_none() {
        let pool = SentencePool {
            easy: vec![],
            medium: vec!["x".into()],
            hard: vec![],
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pool.pick(Difficulty::Easy, &mut rng).is_none());
    }
}
