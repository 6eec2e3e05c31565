//! Time source for snapshot timestamps.

use chrono::{DateTime, Utc};

/// Supplies the current UTC instant.
///
/// Injected into services so snapshot timestamps are deterministic in tests.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
