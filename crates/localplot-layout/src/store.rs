//! # Item Store
//!
//! Ordered collection of loaded drawings. Each entry owns its drawing group
//! behind its own mutex, so a background job and the UI can work on
//! different drawings at the same time.
//!
//! Access to a group goes through [`EntryGuard`], an owned guard tied to the
//! entry's [`EntryId`]. Dropping the guard releases the entry on every path.

use crate::error::{LayoutError, LayoutResult};
use crate::group::{GroupFlag, ItemGroup, Polygon};
use localplot_core::{thread_safe_none, thread_safe_some, Point, Rect, ThreadSafeOption};
use parking_lot::{ArcMutexGuard, RawMutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity of a store entry.
///
/// Assigned once on insert and never reused, so it stays valid while other
/// entries are sorted, added, or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Processing order imposed by [`ItemStore::sort_stable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Order in which the drawings were loaded.
    #[default]
    LoadOrder,
    /// By display name, load order breaking ties.
    Name,
    /// Longest bounding-box side first.
    LargestFirst,
}

/// Identity and file metadata of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    pub id: EntryId,
    pub filename: String,
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone)]
struct Entry {
    info: EntryInfo,
    group: ThreadSafeOption<ItemGroup>,
}

/// Exclusive access to one entry's group.
pub struct EntryGuard {
    id: EntryId,
    guard: ArcMutexGuard<RawMutex, Option<ItemGroup>>,
}

impl EntryGuard {
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The group, or `None` if it has not been materialized
    pub fn group(&self) -> Option<&ItemGroup> {
        (*self.guard).as_ref()
    }

    pub fn group_mut(&mut self) -> Option<&mut ItemGroup> {
        (*self.guard).as_mut()
    }

    /// The group, created empty if missing
    pub fn materialize(&mut self) -> &mut ItemGroup {
        (*self.guard).get_or_insert_with(ItemGroup::new)
    }
}

impl fmt::Debug for EntryGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryGuard")
            .field("id", &self.id)
            .field("has_group", &self.guard.is_some())
            .finish()
    }
}

/// Ordered collection of loaded drawings
#[derive(Debug)]
pub struct ItemStore {
    entries: RwLock<Vec<Entry>>,
    next_id: AtomicU64,
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Entry identities in the current order
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.read().iter().map(|e| e.info.id).collect()
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.read().iter().any(|e| e.info.id == id)
    }

    /// Add a drawing with no group yet
    pub fn insert(&self, path: impl AsRef<Path>) -> EntryId {
        self.push(path.as_ref(), thread_safe_none())
    }

    /// Add a drawing together with its group
    pub fn insert_with_group(&self, path: impl AsRef<Path>, group: ItemGroup) -> EntryId {
        self.push(path.as_ref(), thread_safe_some(group))
    }

    fn push(&self, path: &Path, group: ThreadSafeOption<ItemGroup>) -> EntryId {
        let id = EntryId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.clone());
        let info = EntryInfo {
            id,
            filename,
            path: path.to_path_buf(),
            name,
        };
        tracing::debug!("Store: added {} ({})", id, info.path.display());
        self.entries.write().push(Entry { info, group });
        id
    }

    /// Remove an entry. Returns false if it was not present.
    ///
    /// A holder of the entry's guard keeps the group alive until it drops it.
    pub fn remove(&self, id: EntryId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.info.id != id);
        let removed = entries.len() != before;
        if removed {
            tracing::debug!("Store: removed {}", id);
        }
        removed
    }

    pub fn entry_info(&self, id: EntryId) -> Option<EntryInfo> {
        self.entries
            .read()
            .iter()
            .find(|e| e.info.id == id)
            .map(|e| e.info.clone())
    }

    fn slot(&self, id: EntryId) -> LayoutResult<ThreadSafeOption<ItemGroup>> {
        self.entries
            .read()
            .iter()
            .find(|e| e.info.id == id)
            .map(|e| e.group.clone())
            .ok_or(LayoutError::UnknownEntry(id))
    }

    /// Lock an entry without blocking.
    ///
    /// Fails with [`LayoutError::EntryLocked`] if anyone else holds it.
    pub fn try_lock_group(&self, id: EntryId) -> LayoutResult<EntryGuard> {
        let slot = self.slot(id)?;
        let guard = slot.try_lock_arc().ok_or(LayoutError::EntryLocked(id))?;
        Ok(EntryGuard { id, guard })
    }

    /// Lock an entry, waiting for the current holder to release it
    pub fn lock_group(&self, id: EntryId) -> LayoutResult<EntryGuard> {
        let slot = self.slot(id)?;
        Ok(EntryGuard {
            id,
            guard: slot.lock_arc(),
        })
    }

    /// Append a primitive to an entry, creating its group if needed
    pub fn add_polygon(&self, id: EntryId, polygon: Polygon) -> LayoutResult<()> {
        let mut guard = self.lock_group(id)?;
        guard.materialize().add_polygon(polygon);
        Ok(())
    }

    pub fn set_group_flag(&self, id: EntryId, flag: GroupFlag, value: bool) -> LayoutResult<()> {
        let mut guard = self.lock_group(id)?;
        let group = guard.group_mut().ok_or(LayoutError::EmptyGroup(id))?;
        group.set_flag(flag, value);
        Ok(())
    }

    /// Move an entry so its bounding box starts at the placement origin
    pub fn apply_placement(&self, id: EntryId, placement: &Rect) -> LayoutResult<()> {
        let mut guard = self.lock_group(id)?;
        let group = guard.group_mut().ok_or(LayoutError::EmptyGroup(id))?;
        group.move_bounds_to(Point::new(placement.x, placement.y))?;
        tracing::trace!("Store: {} moved to {}", id, placement);
        Ok(())
    }

    /// Current sheet bounding box of an entry's group
    pub fn scene_rect(&self, id: EntryId) -> LayoutResult<Rect> {
        let guard = self.lock_group(id)?;
        let group = guard.group().ok_or(LayoutError::EmptyGroup(id))?;
        Ok(group.scene_rect()?)
    }

    /// Impose a deterministic order on the entries.
    ///
    /// Ties are broken by load order, so the result depends only on `order`
    /// and never on an earlier sort. For [`SortOrder::LargestFirst`] an entry
    /// whose group is locked, missing, or unmeasurable sorts as size zero.
    pub fn sort_stable(&self, order: SortOrder) {
        let mut entries = self.entries.write();
        match order {
            SortOrder::LoadOrder => entries.sort_by_key(|e| e.info.id),
            SortOrder::Name => entries.sort_by(|a, b| {
                a.info
                    .name
                    .cmp(&b.info.name)
                    .then(a.info.id.cmp(&b.info.id))
            }),
            SortOrder::LargestFirst => {
                let mut keyed: Vec<(f64, Entry)> = entries
                    .drain(..)
                    .map(|e| {
                        let size = e
                            .group
                            .try_lock()
                            .and_then(|g| (*g).as_ref().and_then(|g| g.bounding_rect().ok()))
                            .map(|r| r.longest_side())
                            .unwrap_or(0.0);
                        (size, e)
                    })
                    .collect();
                keyed.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.info.id.cmp(&b.1.info.id)));
                entries.extend(keyed.into_iter().map(|(_, e)| e));
            }
        }
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}
