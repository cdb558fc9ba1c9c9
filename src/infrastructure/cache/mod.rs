//! Throttle counter stores

mod memory_rate_limiter;
mod redis_rate_limiter;

pub use memory_rate_limiter::InMemoryRateLimiter;
pub use redis_rate_limiter::{DEFAULT_KEY_PREFIX, RedisRateLimiter};
