//! Identifier generation

use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// New opaque identifier such as `ing_1767225600000_3`
pub fn generate_id(prefix: &str) -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}_{}", prefix, chrono::Utc::now().timestamp_millis(), seq)
}
