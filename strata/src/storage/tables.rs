//! The table registry.
//!
//! Tables are interned by kind: asking for the same kind twice yields the
//! same table id, which is what makes a kind the identity of an archetype.
//! The registry also hands out disjoint mutable borrows of two tables, which
//! merge needs.

use std::collections::HashMap;

use crate::{
    kind::Kind,
    storage::table::{self, Table},
    world::World,
};

/// All tables of one world, interned by kind.
#[derive(Default)]
pub struct Tables {
    /// Tables indexed by their id.
    tables: Vec<Table>,

    /// Kind to table id interning.
    by_kind: HashMap<Kind, table::Id>,
}

impl Tables {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            by_kind: HashMap::new(),
        }
    }

    /// The table for `kind`, creating it if this kind is new. Creation
    /// allocates the committed body from the world's component descriptors.
    pub fn ensure(&mut self, world: &World, kind: Kind) -> table::Id {
        if let Some(&id) = self.by_kind.get(&kind) {
            return id;
        }
        let id = table::Id::new(self.tables.len() as u32);
        self.by_kind.insert(kind.clone(), id);
        self.tables.push(Table::new(world, id, kind));
        id
    }

    /// The id interned for `kind`, if any.
    #[inline]
    pub fn id_of(&self, kind: &Kind) -> Option<table::Id> {
        self.by_kind.get(kind).copied()
    }

    /// The table with the given id.
    #[inline]
    pub fn get(&self, id: table::Id) -> Option<&Table> {
        self.tables.get(id.index())
    }

    /// The table with the given id, mutably.
    #[inline]
    pub fn get_mut(&mut self, id: table::Id) -> Option<&mut Table> {
        self.tables.get_mut(id.index())
    }

    /// Disjoint mutable borrows of two tables, for merge.
    ///
    /// # Panics
    /// Panics if the ids are equal or either is unknown.
    pub fn pair_mut(&mut self, a: table::Id, b: table::Id) -> (&mut Table, &mut Table) {
        assert!(a != b, "pair_mut requires two distinct tables");
        let (low, high, flipped) = if a.index() < b.index() {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        let (head, tail) = self.tables.split_at_mut(high);
        let (first, second) = (&mut head[low], &mut tail[0]);
        if flipped { (second, first) } else { (first, second) }
    }

    /// Number of tables.
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no tables exist.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate all tables in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }
}
