//! Creation of new unique identifiers.
//!
//! Identifiers are made of a root followed by a time stamp
//! in units of 100 nanoseconds since the start of the year 2000 (UTC).
//! Generation is serialized per generator,
//! and every identifier carries a strictly greater stamp than the previous one.

use crate::IMPLEMENTATION_CLASS_UID;
use dcm_core::{Uid, UidType};
use once_cell::sync::Lazy;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds from the Unix epoch to 2000-01-01T00:00:00Z.
const Y2K_SECONDS: u64 = 946_684_800;

static GLOBAL: Lazy<UidGenerator> = Lazy::new(|| UidGenerator::new(IMPLEMENTATION_CLASS_UID));

/// Create a new SOP instance UID under the implementation root.
///
/// Safe to call from many threads at once.
pub fn generate() -> Uid {
    GLOBAL.generate()
}

/// A source of unique identifiers under a fixed root.
#[derive(Debug)]
pub struct UidGenerator {
    root: String,
    last_ticks: Mutex<u64>,
}

impl UidGenerator {
    pub fn new(root: impl Into<String>) -> Self {
        UidGenerator {
            root: root.into(),
            last_ticks: Mutex::new(0),
        }
    }

    /// The root of every identifier created.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Create a new identifier, waiting for the clock to advance if needed.
    pub fn generate(&self) -> Uid {
        let mut last = self.last_ticks.lock().unwrap_or_else(|e| e.into_inner());
        let mut ticks = current_ticks();
        while ticks == *last {
            std::thread::yield_now();
            ticks = current_ticks();
        }
        if ticks < *last {
            tracing::warn!("System clock went backwards, continuing from the last time stamp");
            ticks = *last + 1;
        }
        *last = ticks;
        drop(last);
        generate_with(&Uid::unknown(self.root.as_str()), ticks)
    }
}

/// An identifier made of a base identifier and a sequence number.
pub fn generate_with(base: &Uid, sequence: u64) -> Uid {
    Uid::new(
        format!("{}.{}", base.uid(), sequence),
        "SOP Instance UID",
        UidType::SopInstance,
    )
}

fn current_ticks() -> u64 {
    let since_y2k = SystemTime::now()
        .duration_since(UNIX_EPOCH + Duration::from_secs(Y2K_SECONDS))
        .unwrap_or_default();
    (since_y2k.as_nanos() / 100) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_appended_to_base() {
        let uid = generate_with(&Uid::unknown("1.2.3"), 42);
        assert_eq!(uid.uid(), "1.2.3.42");
        assert_eq!(uid.name(), "SOP Instance UID");
        assert_eq!(uid.uid_type(), UidType::SopInstance);
    }

    #[test]
    fn suffixes_increase() {
        let generator = UidGenerator::new("1.2.3");
        let suffix = |uid: Uid| -> u64 {
            uid.uid()
                .strip_prefix("1.2.3.")
                .unwrap()
                .parse()
                .unwrap()
        };
        let mut previous = suffix(generator.generate());
        for _ in 0..50 {
            let next = suffix(generator.generate());
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn global_uids_fit_in_64_characters() {
        let uid = generate();
        assert!(uid.uid().starts_with(IMPLEMENTATION_CLASS_UID));
        assert!(uid.uid().len() <= 64);
    }
}
