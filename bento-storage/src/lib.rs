//! Bento Storage - TTL cache over pluggable key-value backends
//!
//! The client keeps its session state (current user, selected project, known
//! languages) in a small key-value store. This crate provides:
//!
//! - [`StorageBackend`]: the string-to-string store the cache writes into.
//!   [`MemoryStorage`] for tests and short-lived processes, [`FileStorage`]
//!   for state that must survive between CLI invocations.
//! - [`Clock`]: the time source used for expiry, so tests can move time
//!   forward explicitly with [`ManualClock`].
//! - [`Cache`]: a namespaced store of `{ data, expiresAt }` envelopes with
//!   lazy expiry on read, addressed through typed [`CacheKey`]s.
//!
//! # Example
//!
//! ```ignore
//! const USER_ID: CacheKey<UserId> = CacheKey::new("user_id");
//!
//! let cache = Cache::new(Arc::new(MemoryStorage::new()), Arc::new(SystemClock), CacheConfig::default());
//! cache.set(&USER_ID, &UserId::new(1))?;
//! assert_eq!(cache.get(&USER_ID)?, Some(UserId::new(1)));
//! ```

pub mod backend;
pub mod cache;
pub mod clock;
pub mod error;
pub mod file_backend;

pub use backend::{MemoryStorage, StorageBackend};
pub use cache::{Cache, CacheConfig, CacheEntry, CacheKey, CacheStats, DEFAULT_NAMESPACE, DEFAULT_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StorageError, StorageResult};
pub use file_backend::FileStorage;
