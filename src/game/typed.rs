use crate::input::{KeyAction, KeyInput};

/// What to do with the buffer when it stops being a prefix of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// Start the word over
    Reset,
    /// Leave it for the player to backspace
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferOutcome {
    Progress,
    Complete,
    Mismatch,
    Erased,
    Ignored,
}

impl BufferOutcome {
    /// Whether the key counted as a correct keystroke
    pub fn judged(&self) -> Option<bool> {
        match self {
            BufferOutcome::Progress | BufferOutcome::Complete => Some(true),
            BufferOutcome::Mismatch => Some(false),
            BufferOutcome::Erased | BufferOutcome::Ignored => None,
        }
    }
}

/// Typed-so-far text for word and sentence targets
#[derive(Debug, Clone)]
pub struct TypedBuffer {
    typed: String,
    policy: MismatchPolicy,
}

impl TypedBuffer {
    pub fn new(policy: MismatchPolicy) -> Self {
        Self {
            typed: String::new(),
            policy,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.typed
    }

    pub fn is_empty(&self) -> bool {
        self.typed.is_empty()
    }

    pub fn clear(&mut self) {
        self.typed.clear();
    }

    /// Applies one key against `target`. The caller clears the buffer after
    /// `Complete` once it has consumed the unit.
    pub fn feed(&mut self, key: &KeyInput, target: &str) -> BufferOutcome {
        match key.action() {
            KeyAction::Ignored => BufferOutcome::Ignored,
            KeyAction::Backspace => {
                if self.typed.pop().is_some() {
                    BufferOutcome::Erased
                } else {
                    BufferOutcome::Ignored
                }
            }
            KeyAction::Char(c) => {
                self.typed.push(c);
                if self.typed == target {
                    BufferOutcome::Complete
                } else if target.starts_with(self.typed.as_str()) {
                    BufferOutcome::Progress
                } else {
                    if self.policy == MismatchPolicy::Reset {
                        self.typed.clear();
                    }
                    BufferOutcome::Mismatch
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_str(buf: &mut TypedBuffer, text: &str, target: &str) -> Vec<BufferOutcome> {
        text.chars()
            .map(|c| buf.feed(&KeyInput::char(c), target))
            .collect()
    }

    #[test]
    fn exact_word_completes() {
        let mut buf = TypedBuffer::new(MismatchPolicy::Reset);
        let outcomes = feed_str(&mut buf, "up", "up");
        assert_eq!(outcomes, vec![BufferOutcome::Progress, BufferOutcome::Complete]);
    }

    #[test]
    fn reset_policy_clears_on_mismatch() {
        let mut buf = TypedBuffer::new(MismatchPolicy::Reset);
        feed_str(&mut buf, "ri", "right");
        assert_eq!(buf.feed(&KeyInput::char('x'), "right"), BufferOutcome::Mismatch);
        assert!(buf.is_empty());
    }

    #[test]
    fn keep_policy_allows_correction() {
        let mut buf = TypedBuffer::new(MismatchPolicy::Keep);
        feed_str(&mut buf, "Thx", "The cat.");
        assert_eq!(buf.as_str(), "Thx");
        assert_eq!(buf.feed(&KeyInput::backspace(), "The cat."), BufferOutcome::Erased);
        let outcomes = feed_str(&mut buf, "e cat.", "The cat.");
        assert_eq!(outcomes.last(), Some(&BufferOutcome::Complete));
    }

    #[test]
    fn keep_policy_keeps_reporting_mismatch_until_fixed() {
        let mut buf = TypedBuffer::new(MismatchPolicy::Keep);
        let outcomes = feed_str(&mut buf, "xa", "ab");
        assert_eq!(outcomes, vec![BufferOutcome::Mismatch, BufferOutcome::Mismatch]);
    }

    #[test]
    fn backspace_on_empty_is_ignored() {
        let mut buf = TypedBuffer::new(MismatchPolicy::Keep);
        assert_eq!(buf.feed(&KeyInput::backspace(), "a"), BufferOutcome::Ignored);
        assert_eq!(buf.feed(&KeyInput::new("Enter"), "a"), BufferOutcome::Ignored);
    }

    #[test]
    fn judged_classification() {
        assert_eq!(BufferOutcome::Complete.judged(), Some(true));
        assert_eq!(BufferOutcome::Mismatch.judged(), Some(false));
        assert_eq!(BufferOutcome::Erased.judged(), None);
    }
}
