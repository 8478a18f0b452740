//! Type aliases for the shared-state types used across crates.
//!
//! Loaded drawings are touched from the UI thread and from background jobs,
//! so everything here is `Send + Sync` and built on `parking_lot` locks.
//!
//! ```rust,ignore
//! use localplot_core::types::*;
//!
//! let slot: ThreadSafeOption<MyGroup> = thread_safe_none();
//! if let Some(guard) = slot.try_lock() {
//!     // ...
//! }
//! ```

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex`, which also offers `try_lock_arc` for owned guards.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe optional slot for lazily-materialized state.
pub type ThreadSafeOption<T> = Arc<Mutex<Option<T>>>;

/// A thread-safe reader-writer hash map.
pub type ThreadSafeRwMap<K, V> = Arc<RwLock<HashMap<K, V>>>;

/// Progress reporter called with `(done, total)` steps.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Create a new `ThreadSafeOption<T>` initialized to `None`.
#[inline]
pub fn thread_safe_none<T>() -> ThreadSafeOption<T> {
    Arc::new(Mutex::new(None))
}

/// Create a new `ThreadSafeOption<T>` initialized to `Some(value)`.
#[inline]
pub fn thread_safe_some<T>(value: T) -> ThreadSafeOption<T> {
    Arc::new(Mutex::new(Some(value)))
}

/// Create a new empty `ThreadSafeRwMap<K, V>`.
#[inline]
pub fn thread_safe_rw_map<K, V>() -> ThreadSafeRwMap<K, V> {
    Arc::new(RwLock::new(HashMap::new()))
}
