use async_trait::async_trait;
use chrono::Duration;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

use crate::domain::auth::entities::AttemptCounter;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{Clock, RateLimiter};
use crate::domain::auth::value_objects::ThrottleKey;

/// Expired windows are swept once the map grows past this many keys
const CLEANUP_THRESHOLD: usize = 10_000;

/// Process-local throttle store
///
/// Uses `DashMap` so that the read-modify-write of a single key happens under
/// that key's shard lock. Suitable for a single instance; multi-instance
/// deployments should use the Redis store so every node sees the same counts.
pub struct InMemoryRateLimiter {
  counters: DashMap<String, AttemptCounter>,
  clock: Arc<dyn Clock>,
}

impl InMemoryRateLimiter {
  pub fn new(clock: Arc<dyn Clock>) -> Self {
    Self {
      counters: DashMap::new(),
      clock,
    }
  }

  /// Returns the live window for a key, dropping it if it has lapsed
  fn live_counter(&self, key: &ThrottleKey) -> Option<AttemptCounter> {
    let now = self.clock.now();
    self
      .counters
      .remove_if(key.as_str(), |_, counter| counter.is_expired_at(now));

    self.counters.get(key.as_str()).map(|entry| *entry.value())
  }

  fn purge_expired(&self) {
    let now = self.clock.now();
    self
      .counters
      .retain(|_, counter| !counter.is_expired_at(now));
  }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
  async fn attempts(&self, key: &ThrottleKey) -> Result<u32, AuthError> {
    Ok(self.live_counter(key).map_or(0, |counter| counter.hits))
  }

  async fn hit(&self, key: &ThrottleKey, decay_seconds: u64) -> Result<u32, AuthError> {
    let now = self.clock.now();
    let decay = Duration::seconds(decay_seconds as i64);

    let hits = match self.counters.entry(key.as_str().to_string()) {
      Entry::Occupied(mut entry) => {
        let counter = entry.get_mut();
        if counter.is_expired_at(now) {
          *counter = AttemptCounter::start(now, decay);
        } else {
          counter.hits += 1;
        }
        counter.hits
      }
      Entry::Vacant(entry) => {
        entry.insert(AttemptCounter::start(now, decay));
        1
      }
    };

    if self.counters.len() > CLEANUP_THRESHOLD {
      self.purge_expired();
    }

    Ok(hits)
  }

  async fn clear(&self, key: &ThrottleKey) -> Result<(), AuthError> {
    self.counters.remove(key.as_str());
    Ok(())
  }

  async fn available_in(&self, key: &ThrottleKey) -> Result<u64, AuthError> {
    let now = self.clock.now();
    Ok(
      self
        .live_counter(key)
        .map_or(0, |counter| counter.seconds_remaining(now)),
    )
  }
}
