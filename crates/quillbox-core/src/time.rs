//! Timestamp helpers shared across the workspace.

use time::OffsetDateTime;

/// Returns the current UTC time.
///
/// All timestamps in the system are produced through this single function so
/// store backends and the domain layer agree on the clock.
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}
