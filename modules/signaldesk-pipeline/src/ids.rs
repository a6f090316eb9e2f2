//! Entity id minting.
//!
//! Ids are a fixed prefix per entity kind plus a millisecond timestamp
//! (`sig_1700000000000`). The stamp is strictly monotonic per process so
//! two runs in the same millisecond cannot collide.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// A unique, time-ordered millisecond stamp.
pub fn stamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

pub fn signal_id(stamp: i64) -> String {
    format!("sig_{stamp}")
}

pub fn story_id(stamp: i64) -> String {
    format!("story_{stamp}")
}

pub fn cluster_id(stamp: i64) -> String {
    format!("cluster_{stamp}")
}

pub fn draft_id(stamp: i64) -> String {
    format!("d_{stamp}")
}

pub fn claim_id(signal_id: &str, index: usize) -> String {
    format!("cl_{signal_id}_{index}")
}

pub fn evidence_id(signal_id: &str, index: usize) -> String {
    format!("ev_{signal_id}_{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_are_strictly_increasing() {
        let a = stamp();
        let b = stamp();
        let c = stamp();
        assert!(a < b && b < c);
    }

    #[test]
    fn child_ids_trace_to_owner() {
        let sig = signal_id(1700000000000);
        assert_eq!(claim_id(&sig, 0), "cl_sig_1700000000000_0");
        assert_eq!(evidence_id(&sig, 2), "ev_sig_1700000000000_2");
    }
}
