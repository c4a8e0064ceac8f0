//! Locally generated entity identifiers.
//!
//! Format: `<prefix>_<millis>_<random>`, e.g. `proj_1758306032508_uykqi95ei`.
//! Callers must treat the value as opaque.

use std::sync::atomic::{AtomicI64, Ordering};

use rand::Rng;

/// Prefix for project identifiers.
pub const PROJECT_ID_PREFIX: &str = "proj";

/// Prefix for task identifiers.
pub const TASK_ID_PREFIX: &str = "task";

/// Length of the random base-36 suffix.
pub const RANDOM_SUFFIX_LENGTH: usize = 9;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Last time component handed out in this process.
static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Generate a new identifier with the given prefix.
///
/// The time component is strictly increasing within the process, so two
/// calls never collide even when the random suffixes do.
pub fn generate_id(prefix: &str) -> String {
    let millis = next_millis(chrono::Utc::now().timestamp_millis());

    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LENGTH)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();

    format!("{prefix}_{millis}_{suffix}")
}

/// Generate a project identifier.
pub fn project_id() -> String {
    generate_id(PROJECT_ID_PREFIX)
}

/// Generate a task identifier.
pub fn task_id() -> String {
    generate_id(TASK_ID_PREFIX)
}

/// Returns `now`, or one past the previous value when the clock has not
/// advanced (or went backwards).
fn next_millis(now: i64) -> i64 {
    let previous = LAST_MILLIS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(previous + 1)
}
