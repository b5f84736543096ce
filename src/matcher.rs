use std::collections::BTreeSet;

/// Immutable text a session is measured against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetText {
    text: String,
    chars: Vec<char>,
}

impl TargetText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = text.chars().collect();
        Self { text, chars }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Whitespace-separated lexical units
    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

impl From<&str> for TargetText {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TargetText {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum CharStatus {
    Pending,
    Correct,
    Incorrect,
    Current,
}

/// Exact, case-sensitive comparison. Spaces match only spaces.
pub fn judge(expected: char, received: char) -> bool {
    expected == received
}

/// Judges `received` against the character at `idx`.
/// Returns `None` when `idx` is past the end of the target.
pub fn judge_at(target: &TargetText, idx: usize, received: char) -> Option<bool> {
    target
        .char_at(idx)
        .map(|expected| judge(expected, received))
}

/// Per-position status for rendering.
///
/// Positions before the cursor are judged, the cursor position is `Current`
/// unless the input is complete, everything after is `Pending`.
pub fn character_states(
    target: &TargetText,
    cursor: usize,
    errors: &BTreeSet<usize>,
    complete: bool,
) -> Vec<CharStatus> {
    (0..target.len())
        .map(|idx| {
            if idx < cursor {
                if errors.contains(&idx) {
                    CharStatus::Incorrect
                } else {
                    CharStatus::Correct
                }
            } else if idx == cursor && !complete {
                CharStatus::Current
            } else {
                CharStatus::Pending
            }
        })
        .collect()
}
