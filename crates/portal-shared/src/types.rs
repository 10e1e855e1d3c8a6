//! Common types

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub type EntityId = String;
pub type Timestamp = DateTime<Utc>;

/// Fresh entity id, e.g. `project_3f2c...`. Random v4 so ids never collide
/// within a process even when created in the same clock tick.
pub fn new_id(prefix: &str) -> EntityId {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// Current time, but never earlier than or equal to `previous`.
pub fn timestamp_after(previous: Timestamp) -> Timestamp {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_has_prefix_and_is_unique() {
        let a = new_id("project");
        let b = new_id("project");
        assert!(a.starts_with("project_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_timestamp_after_future_value() {
        let future = Utc::now() + Duration::hours(1);
        assert!(timestamp_after(future) > future);
    }
}
