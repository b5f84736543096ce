use serde::{Deserialize, Serialize};

/// Characters per word in the standard WPM definition
pub const CHARS_PER_WORD: f64 = 5.0;

/// Smallest denominator used for rate math, one second in minutes
const MIN_MINUTES: f64 = 1.0 / 60.0;

/// Snapshot of typing performance, always derived from counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub wpm: u32,
    pub gross_wpm: u32,
    pub cpm: u32,
    pub accuracy: u32,
    pub errors: u32,
    pub elapsed_seconds: u64,
}

fn non_negative(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Computes WPM, gross WPM, CPM and accuracy from raw counters.
///
/// WPM counts correct characters only; gross WPM and CPM count every typed
/// character. Accuracy is 100 before anything has been typed.
pub fn compute(
    correct_count: u32,
    total_typed_count: u32,
    error_count: u32,
    elapsed_seconds: f64,
) -> SessionMetrics {
    let elapsed_seconds = elapsed_seconds.max(0.0);
    let minutes = (elapsed_seconds / 60.0).max(MIN_MINUTES);

    let gross_wpm = non_negative((total_typed_count as f64 / CHARS_PER_WORD) / minutes);
    let wpm = non_negative((correct_count as f64 / CHARS_PER_WORD) / minutes);
    let cpm = non_negative(total_typed_count as f64 / minutes);

    let accuracy = if total_typed_count > 0 {
        (100.0 * correct_count as f64 / total_typed_count as f64)
            .round()
            .clamp(0.0, 100.0) as u32
    } else {
        100
    };

    SessionMetrics {
        wpm,
        gross_wpm,
        cpm,
        accuracy,
        errors: error_count,
        elapsed_seconds: elapsed_seconds.round() as u64,
    }
}
