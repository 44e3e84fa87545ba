//! TTL-bounded single-slot cache for fetched release records.
//!
//! Exactly one repository is tracked per running instance, so a single
//! mutex-guarded slot keyed by the identity slug is enough; there is no
//! per-key locking or LRU machinery. Expiry is lazy: it is only detected
//! at read time, there is no background eviction thread.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

use crate::identity::RepoIdentity;
use crate::release::ReleaseRecord;

/// Default time-to-live for cached release records (6 hours).
pub const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// A release record plus the bookkeeping needed to age it out.
#[derive(Debug, Clone)]
struct CachedEntry {
    /// `owner/name` slug the record belongs to.
    slug: String,
    record: ReleaseRecord,
    fetched_at: Instant,
    ttl: Duration,
}

impl CachedEntry {
    /// Fresh while `now < fetched_at + ttl`.
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.fetched_at) < self.ttl
    }
}

/// Single-slot read-through cache shared across requests.
///
/// Safe for concurrent use: reads and writes both go through the one
/// mutex guarding the slot.
#[derive(Debug, Default)]
pub struct ReleaseCache {
    slot: Mutex<Option<CachedEntry>>,
}

impl ReleaseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached record for this identity, only if still fresh.
    ///
    /// An expired entry is evicted on the spot and reported as absent,
    /// so the caller must re-fetch.
    pub fn get(&self, identity: &RepoIdentity) -> Option<ReleaseRecord> {
        self.get_at(identity, Instant::now())
    }

    /// Freshness decided against a supplied clock, for tests.
    fn get_at(&self, identity: &RepoIdentity, now: Instant) -> Option<ReleaseRecord> {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(entry) if entry.slug == identity.slug() => {
                if entry.is_fresh(now) {
                    Some(entry.record.clone())
                } else {
                    log::debug!("cached release for {} expired, evicting", identity.slug());
                    *slot = None;
                    None
                }
            }
            _ => None,
        }
    }

    /// Store a record for this identity, unconditionally overwriting any
    /// existing entry and resetting its fetch time to now.
    pub fn put(&self, identity: &RepoIdentity, record: ReleaseRecord, ttl: Duration) {
        let mut slot = self.slot.lock();
        *slot = Some(CachedEntry {
            slug: identity.slug(),
            record,
            fetched_at: Instant::now(),
            ttl,
        });
    }

    /// Remove this identity's entry immediately, regardless of freshness.
    pub fn invalidate(&self, identity: &RepoIdentity) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|e| e.slug == identity.slug()) {
            log::debug!("invalidating cached release for {}", identity.slug());
            *slot = None;
        }
    }
}
