//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// The wall-clock timestamps are informational. Expiry is decided by a
/// monotonic deadline so system clock steps neither extend nor cut short
/// a TTL.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was inserted or last overwritten
    pub created_at: DateTime<Utc>,
    /// Wall-clock expiration, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
    /// Monotonic expiration, None = no expiration
    deadline: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// A TTL too large to be represented is treated the same as no TTL:
    /// the entry only leaves the store by eviction or deletion.
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        let created_at = Utc::now();
        let deadline = ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        let expires_at = deadline.and(ttl).and_then(|ttl| {
            chrono::Duration::from_std(ttl)
                .ok()
                .and_then(|ttl| created_at.checked_add_signed(ttl))
        });

        Self {
            value,
            created_at,
            expires_at,
            deadline,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: An entry is considered expired when the current time
    /// is greater than or equal to the deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value", None);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new(7u32, Some(Duration::from_secs(60)));

        assert_eq!(entry.value, 7);
        assert!(entry.expires_at.unwrap() > entry.created_at);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_millis(20)));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(30));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let entry = CacheEntry::new("test_value", Some(Duration::ZERO));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let entry = CacheEntry::new("test_value", Some(Duration::MAX));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiry_follows_monotonic_clock_not_wall_clock() {
        let mut entry = CacheEntry::new("test_value", Some(Duration::from_secs(60)));

        // A wall-clock timestamp already in the past does not expire the entry
        entry.expires_at = Some(Utc::now() - chrono::Duration::hours(1));
        assert!(!entry.is_expired());

        // Reaching the monotonic deadline does
        let later = Instant::now() + Duration::from_secs(61);
        assert!(entry.is_expired_at(later));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", Some(Duration::from_millis(50)));
        let deadline = entry.deadline.unwrap();

        // Entry should be expired when current time >= deadline
        assert!(entry.is_expired_at(deadline), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(deadline - Duration::from_millis(1)));
    }
}
