//! The entity index: entity id to storage record.
//!
//! Every stage owns one [`EntityIndex`] mapping entities to the table and row
//! that currently hold them. The storage layer writes records whenever a row
//! moves (swap-remove, swap, rotation, merge); everything else about an
//! entity's lifecycle is managed outside this crate.
//!
//! Entity ids are arbitrary 64-bit handles, so the index hashes rather than
//! assuming a dense id space.

use std::collections::HashMap;

use crate::{entity::Entity, storage::table};

/// Where an entity currently lives.
///
/// `row` is 1-based: row 0 of a table is recorded as 1, and 0 is reserved to
/// mean "not in any table". The one exception is table merge, which records
/// 0-based rows for the rows it moves; the external commit phase
/// re-normalizes them. See the table module for the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// The table holding the entity.
    pub table: table::Id,

    /// The 1-based row within the table (see above for the merge exception).
    pub row: usize,
}

/// A per-stage mapping from entity id to [`Record`].
#[derive(Debug, Default)]
pub struct EntityIndex {
    map: HashMap<Entity, Record>,
}

impl EntityIndex {
    /// Create an empty index.
    #[inline]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// The record for `entity`, if it is in a table.
    #[inline]
    pub fn get(&self, entity: Entity) -> Option<Record> {
        self.map.get(&entity).copied()
    }

    /// Insert or replace the record for `entity`.
    #[inline]
    pub fn set(&mut self, entity: Entity, record: Record) {
        self.map.insert(entity, record);
    }

    /// Remove the record for `entity`, returning the old record if present.
    #[inline]
    pub fn remove(&mut self, entity: Entity) -> Option<Record> {
        self.map.remove(&entity)
    }

    /// Whether the index holds a record for `entity`.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.map.contains_key(&entity)
    }

    /// Number of recorded entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no entities are recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
