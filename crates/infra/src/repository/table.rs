use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use dancu_core::{DomainError, DomainResult, Entity};

/// Ordered in-memory table with a monotonically increasing id sequence.
///
/// Rows are keyed by id in a `BTreeMap`, so iteration is ascending id order.
/// The sequence lives under the same lock as the rows, which makes
/// "allocate id + insert" a single atomic step.
#[derive(Debug)]
pub struct InMemoryTable<K, V> {
    inner: RwLock<TableState<K, V>>,
}

#[derive(Debug)]
pub struct TableState<K, V> {
    pub rows: BTreeMap<K, V>,
    last_id: i64,
}

impl<K, V> TableState<K, V> {
    /// Allocate the next id (starting at 1).
    pub fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

impl<K: Ord, V> InMemoryTable<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TableState {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    pub fn read(&self) -> DomainResult<RwLockReadGuard<'_, TableState<K, V>>> {
        self.inner
            .read()
            .map_err(|_| DomainError::storage("table lock poisoned"))
    }

    pub fn write(&self) -> DomainResult<RwLockWriteGuard<'_, TableState<K, V>>> {
        self.inner
            .write()
            .map_err(|_| DomainError::storage("table lock poisoned"))
    }

    /// Replace an existing row.
    pub fn replace(&self, key: K, value: V) -> DomainResult<()> {
        let mut state = self.write()?;
        match state.rows.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(DomainError::NotFound),
        }
    }

    pub fn remove(&self, key: &K) -> DomainResult<Option<V>> {
        Ok(self.write()?.rows.remove(key))
    }
}

impl<K: Ord, V: Clone> InMemoryTable<K, V> {
    pub fn get(&self, key: &K) -> DomainResult<Option<V>> {
        Ok(self.read()?.rows.get(key).cloned())
    }

    /// Rows matching `keep`, ascending key order.
    pub fn select(&self, keep: impl Fn(&V) -> bool) -> DomainResult<Vec<V>> {
        Ok(self.read()?.rows.values().filter(|v| keep(v)).cloned().collect())
    }
}

impl<V> InMemoryTable<V::Id, V>
where
    V: Entity,
    V::Id: Ord,
{
    /// Overwrite the stored row for `value.id()`.
    pub fn save(&self, value: V) -> DomainResult<()> {
        self.replace(value.id(), value)
    }
}

impl<K: Ord, V> Default for InMemoryTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
