use ketik::clock::ManualClock;
use ketik::feedback::{Feedback, FeedbackLog, FeedbackSink};
use ketik::input::{keys_for, KeyInput};
use ketik::matcher::CharStatus;
use ketik::metrics;
use ketik::session::{SessionEvent, SessionResult, SessionState, TypingSession};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn session(target: &str) -> (ManualClock, TypingSession) {
    let clock = ManualClock::new(10_000);
    let session = TypingSession::new(target, clock.shared());
    (clock, session)
}

fn feed(session: &mut TypingSession, keys: &[KeyInput]) -> Vec<SessionEvent> {
    keys.iter().flat_map(|k| session.keystroke(k)).collect()
}

fn completed(events: &[SessionEvent]) -> SessionResult {
    events
        .iter()
        .find_map(|e| match e {
            SessionEvent::Completed(result) => Some(result.clone()),
            _ => None,
        })
        .expect("session should have completed")
}

#[test]
fn all_correct_keys_complete_the_session() {
    let (_clock, mut s) = session("cat");
    assert_eq!(s.state(), SessionState::Ready);

    let first = s.keystroke(&KeyInput::char('c'));
    assert_eq!(first.first(), Some(&SessionEvent::Started));
    assert_eq!(s.state(), SessionState::Active);

    let events = feed(&mut s, &keys_for("at"));
    assert_eq!(s.state(), SessionState::Completed);

    let result = completed(&events);
    assert_eq!(result.correct_count, 3);
    assert_eq!(result.error_count, 0);
    assert_eq!(result.accuracy, 100);
    assert_eq!(s.character_states(), vec![CharStatus::Correct; 3]);
}

#[test]
fn one_wrong_key_costs_a_third_of_accuracy() {
    let (_clock, mut s) = session("cat");
    let events = feed(&mut s, &keys_for("cxt"));
    let result = completed(&events);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.accuracy, 67);
    assert_eq!(
        s.character_states(),
        vec![CharStatus::Correct, CharStatus::Incorrect, CharStatus::Correct]
    );
    assert_eq!(s.error_set().iter().copied().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn corrected_mistake_still_counts_as_typed() {
    let (_clock, mut s) = session("cat");
    let keys = vec![
        KeyInput::char('c'),
        KeyInput::char('x'),
        KeyInput::backspace(),
        KeyInput::char('a'),
        KeyInput::char('t'),
    ];
    let events = feed(&mut s, &keys);
    let result = completed(&events);

    // backspace never decrements the typed or correct counters
    assert_eq!(result.total_typed_count, 4);
    assert_eq!(result.correct_count, 3);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.uncorrected_errors, 0);
    assert_eq!(result.accuracy, 75);
    assert!(s.error_set().is_empty());
    assert_eq!(s.character_states()[1], CharStatus::Correct);
}

#[test]
fn backspace_restores_cursor_and_error_set() {
    let (_clock, mut s) = session("cat");
    feed(&mut s, &keys_for("c"));
    let cursor = s.cursor();
    let errors = s.error_set().clone();

    s.keystroke(&KeyInput::char('q'));
    s.keystroke(&KeyInput::backspace());
    assert_eq!(s.cursor(), cursor);
    assert_eq!(s.error_set(), &errors);
}

#[test]
fn paused_time_is_not_counted() {
    let (clock, mut s) = session("abcde abcde");
    feed(&mut s, &keys_for("abcde"));
    clock.advance_secs(30);
    s.pause();
    clock.advance_secs(600);
    assert!(s.keystroke(&KeyInput::char(' ')).is_empty());
    s.resume();
    clock.advance_secs(30);
    let events = feed(&mut s, &keys_for(" abcde"));

    let result = completed(&events);
    assert_eq!(result.elapsed_seconds, 60);
    // 11 correct characters in one minute
    assert_eq!(result.wpm, 2);
    assert_eq!(result.cpm, 11);
}

#[test]
fn live_metrics_match_the_calculator() {
    let (clock, mut s) = session("the quick brown fox");
    feed(&mut s, &keys_for("the quack"));
    clock.advance_secs(12);
    let progress = s.progress();
    assert_eq!(
        progress.metrics,
        metrics::compute(progress.correct_characters, 9, progress.error_count, 12.0)
    );
    assert_eq!(progress.cursor, 9);
    assert_eq!(progress.total_characters, 19);
}

#[test]
fn completion_is_reported_once_and_later_keys_are_ignored() {
    let (_clock, mut s) = session("ok");
    let events = feed(&mut s, &keys_for("ok"));
    let completions = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Completed(_)))
        .count();
    assert_eq!(completions, 1);
    assert!(s.keystroke(&KeyInput::char('x')).is_empty());
    assert!(s.keystroke(&KeyInput::backspace()).is_empty());
}

#[test]
fn feedback_follows_judgements() {
    let (_clock, mut s) = session("ab");
    let mut log = FeedbackLog::default();
    for event in feed(&mut s, &keys_for("xb")) {
        log.notify_all(event.feedback());
    }
    assert_eq!(
        log.entries,
        vec![Feedback::Error, Feedback::Correct, Feedback::Complete]
    );
}

#[test]
fn restart_with_new_target_resets_everything() {
    let (_clock, mut s) = session("ab");
    feed(&mut s, &keys_for("ab"));
    s.restart_with("xyz");
    assert_eq!(s.state(), SessionState::Ready);
    assert_eq!(s.cursor(), 0);
    assert_eq!(s.total_typed_count(), 0);
    assert_eq!(s.expected_char(), Some('x'));
}

#[test]
fn cursor_stays_in_bounds_for_random_input() {
    let mut rng = StdRng::seed_from_u64(7);
    let alphabet: Vec<char> = "asdf jkl;ASDF".chars().collect();
    for round in 0..50 {
        let (_clock, mut s) = session("asdf jkl; fdsa");
        let len = s.target().len();
        for _ in 0..200 {
            let key = if rng.gen_bool(0.3) {
                KeyInput::backspace()
            } else {
                KeyInput::char(alphabet[rng.gen_range(0..alphabet.len())])
            };
            s.keystroke(&key);
            assert!(s.cursor() <= len, "round {round}: cursor {} past {len}", s.cursor());
            assert!(s.error_set().iter().all(|&i| i < s.cursor()));
            if s.is_complete() {
                assert_eq!(s.cursor(), len);
                break;
            }
        }
    }
}
