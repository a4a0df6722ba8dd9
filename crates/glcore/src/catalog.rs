//! Handle-keyed registry for GPU object wrappers.

use std::collections::BTreeMap;

use tracing::debug;

use crate::api::RawHandle;

/// Anything that owns exactly one native handle and can be indexed by it.
pub trait CatalogItem {
    fn handle(&self) -> RawHandle;
}

/// Maps native handles to wrapper objects.
///
/// Keys always come from the item's own handle; inserting under an existing
/// handle replaces the prior entry (last-write-wins) and is logged as an
/// update, not treated as an error. Iteration yields handles in ascending
/// order.
#[derive(Debug)]
pub struct Catalog<T> {
    entries: BTreeMap<RawHandle, T>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Catalog<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: CatalogItem> Catalog<T> {
    /// Inserts `item` under its own handle, returning that handle.
    pub fn insert(&mut self, item: T) -> RawHandle {
        let handle = item.handle();
        if self.entries.insert(handle, item).is_some() {
            debug!(handle, "catalog entry replaced");
        }
        handle
    }

    pub fn get(&self, handle: RawHandle) -> Option<&T> {
        self.entries.get(&handle)
    }

    pub fn get_mut(&mut self, handle: RawHandle) -> Option<&mut T> {
        self.entries.get_mut(&handle)
    }

    pub fn remove(&mut self, handle: RawHandle) -> Option<T> {
        self.entries.remove(&handle)
    }

    pub fn handles(&self) -> impl Iterator<Item = RawHandle> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RawHandle, &T)> {
        self.entries.iter().map(|(handle, item)| (*handle, item))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged {
        handle: RawHandle,
        label: &'static str,
    }

    impl CatalogItem for Tagged {
        fn handle(&self) -> RawHandle {
            self.handle
        }
    }

    #[test]
    fn lookup_returns_the_inserted_wrapper() {
        let mut catalog = Catalog::new();
        catalog.insert(Tagged {
            handle: 7,
            label: "first",
        });

        assert_eq!(catalog.get(7).map(|t| t.label), Some("first"));
        assert_eq!(catalog.get(7).map(|t| t.label), Some("first"));
        assert!(catalog.get(8).is_none());
    }

    #[test]
    fn reinsertion_overwrites_last_write_wins() {
        let mut catalog = Catalog::new();
        catalog.insert(Tagged {
            handle: 3,
            label: "old",
        });
        catalog.insert(Tagged {
            handle: 3,
            label: "new",
        });

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(3).map(|t| t.label), Some("new"));
    }

    #[test]
    fn removal_clears_the_entry() {
        let mut catalog = Catalog::new();
        catalog.insert(Tagged {
            handle: 5,
            label: "gone",
        });

        assert_eq!(catalog.remove(5).map(|t| t.label), Some("gone"));
        assert!(catalog.get(5).is_none());
        assert!(catalog.remove(5).is_none());
    }

    #[test]
    fn handles_iterate_in_ascending_order() {
        let mut catalog = Catalog::new();
        for handle in [9, 2, 4] {
            catalog.insert(Tagged { handle, label: "" });
        }

        let handles: Vec<_> = catalog.handles().collect();
        assert_eq!(handles, vec![2, 4, 9]);
    }
}
