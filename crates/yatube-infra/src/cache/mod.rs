//! Cache implementations - Redis and in-memory fallback - and the page cache
//! built on top of them.

mod memory;
mod page;

#[cfg(feature = "redis")]
mod redis;

pub use memory::InMemoryCache;
pub use page::PageCache;

#[cfg(feature = "redis")]
pub use self::redis::{RedisCache, RedisConfig};
