use std::collections::VecDeque;

/// Discrete notification a host may render as sound or animation.
/// The cores never wait on these being handled.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Error,
    Complete,
}

pub trait FeedbackSink {
    fn on_correct(&mut self) {}
    fn on_error(&mut self) {}
    fn on_complete(&mut self) {}

    fn notify(&mut self, feedback: Feedback) {
        match feedback {
            Feedback::Correct => self.on_correct(),
            Feedback::Error => self.on_error(),
            Feedback::Complete => self.on_complete(),
        }
    }

    fn notify_all<I: IntoIterator<Item = Feedback>>(&mut self, feedback: I)
    where
        Self: Sized,
    {
        for f in feedback {
            self.notify(f);
        }
    }
}

/// Drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {}

/// Most notifications a `FeedbackLog` holds before dropping the oldest.
pub const FEEDBACK_LOG_CAPACITY: usize = 64;

/// Keeps the latest notifications in arrival order
#[derive(Debug, Default, Clone)]
pub struct FeedbackLog {
    pub entries: VecDeque<Feedback>,
}

impl FeedbackLog {
    pub fn last(&self) -> Option<Feedback> {
        self.entries.back().copied()
    }

    pub fn count(&self, feedback: Feedback) -> usize {
        self.entries.iter().filter(|f| **f == feedback).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FeedbackSink for FeedbackLog {
    fn notify(&mut self, feedback: Feedback) {
        if self.entries.len() == FEEDBACK_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(feedback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        correct: usize,
        error: usize,
        complete: usize,
    }

    impl FeedbackSink for Counter {
        fn on_correct(&mut self) {
            self.correct += 1;
        }
        fn on_error(&mut self) {
            self.error += 1;
        }
        fn on_complete(&mut self) {
            self.complete += 1;
        }
    }

    #[test]
    fn notify_dispatches_to_callbacks() {
        let mut counter = Counter::default();
        counter.notify_all([
            Feedback::Correct,
            Feedback::Error,
            Feedback::Correct,
            Feedback::Complete,
        ]);
        assert_eq!(counter.correct, 2);
        assert_eq!(counter.error, 1);
        assert_eq!(counter.complete, 1);
    }

    #[test]
    fn log_records_in_order() {
        let mut log = FeedbackLog::default();
        log.notify_all([Feedback::Error, Feedback::Complete]);
        assert_eq!(log.entries, vec![Feedback::Error, Feedback::Complete]);
        assert_eq!(log.last(), Some(Feedback::Complete));
        assert_eq!(log.count(Feedback::Error), 1);
        log.clear();
        assert!(log.entries.is_empty());
    }

    #[test]
    fn log_keeps_only_the_latest_entries() {
        let mut log = FeedbackLog::default();
        for _ in 0..FEEDBACK_LOG_CAPACITY * 3 {
            log.notify(Feedback::Correct);
        }
        log.notify(Feedback::Error);
        assert_eq!(log.entries.len(), FEEDBACK_LOG_CAPACITY);
        assert_eq!(log.last(), Some(Feedback::Error));
        assert_eq!(log.count(Feedback::Correct), FEEDBACK_LOG_CAPACITY - 1);
    }
}
