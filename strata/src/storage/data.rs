//! The column body of one table.
//!
//! [`TableData`] bundles the entity-id column with the component columns
//! parallel to a table's kind. It is a plain value: the staging layer builds
//! shadow bodies keyed by kind, and `replace_columns` swaps a table's body
//! wholesale, so nothing here refers back to the owning table.
//!
//! The entity column's length is the authoritative row count; every
//! data-bearing component column is kept in lockstep with it.

use std::mem;

use crate::{
    component,
    entity::Entity,
    kind::Kind,
    storage::{column::Column, mem::GrowthStrategy, row::Row},
};

/// The entity column and component columns of one table.
pub struct TableData {
    /// Entity ids, one per row.
    entities: Vec<Entity>,

    /// Component columns, parallel to the owning kind.
    columns: Vec<Column>,
}

impl TableData {
    /// Allocate an empty body for a table of the given kind.
    ///
    /// Each kind element is resolved through the descriptor registry: a
    /// data-bearing descriptor sets the column's element size, while tags and
    /// relation ids (no descriptor) produce bufferless columns.
    pub fn new(components: &component::Registry, kind: &Kind, growth: GrowthStrategy) -> Self {
        Self {
            entities: Vec::new(),
            columns: kind
                .ids()
                .iter()
                .map(|&id| Column::new(components.column_size(id), growth.clone()))
                .collect(),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the body holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The entity ids, one per row.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The entity stored at `row`, if in bounds.
    #[inline]
    pub fn entity(&self, row: Row) -> Option<Entity> {
        self.entities.get(row.index()).copied()
    }

    /// The component columns, parallel to the kind.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The column at kind position `index`.
    #[inline]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// The column at kind position `index`, mutably. Callers use this to
    /// write component values into rows appended by insert, grow or merge.
    #[inline]
    pub fn column_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    /// Append one row for `entity`, leaving component slots uninitialized.
    /// Returns the new row and whether any component column reallocated.
    pub(crate) fn push(&mut self, entity: Entity) -> (Row, bool) {
        self.entities.push(entity);
        let mut reallocated = false;
        for column in &mut self.columns {
            reallocated |= column.push_uninit();
        }
        (Row::new(self.entities.len() - 1), reallocated)
    }

    /// Append `count` rows with consecutive entity ids starting at `first`,
    /// leaving component slots uninitialized. Returns the first new row and
    /// whether any component column reallocated.
    pub(crate) fn grow(&mut self, first: Entity, count: usize) -> (Row, bool) {
        self.entities
            .extend((0..count as u64).map(|i| first.offset(i)));
        let mut reallocated = false;
        for column in &mut self.columns {
            reallocated |= column.grow_uninit(count);
        }
        (Row::new(self.entities.len() - count), reallocated)
    }

    /// Remove `row` by overwriting it with the last row across the entity
    /// column and every component column. Returns the entity that moved into
    /// `row`, or `None` if the last row was removed.
    pub(crate) fn swap_remove(&mut self, row: Row) -> Option<Entity> {
        let count = self.entities.len();
        assert!(count > 0, "delete from an empty table");
        let last = count - 1;
        assert!(row.index() <= last, "row index out of bounds");

        self.entities.swap_remove(row.index());
        for column in &mut self.columns {
            column.swap_remove(row);
        }

        if row.index() == last {
            None
        } else {
            Some(self.entities[row.index()])
        }
    }

    /// Exchange two rows across all columns. Returns the entities that
    /// occupied `(a, b)` before the exchange.
    pub(crate) fn swap(&mut self, a: Row, b: Row) -> (Entity, Entity) {
        let (e1, e2) = (self.entities[a.index()], self.entities[b.index()]);
        self.entities.swap(a.index(), b.index());
        for column in &mut self.columns {
            column.swap(a, b);
        }
        (e1, e2)
    }

    /// Rotate the window of `count` rows starting at `row` leftward by one
    /// across all columns; the row at `row - 1` lands at `row + count - 1`.
    pub(crate) fn rotate_back(&mut self, row: usize, count: usize) {
        assert!(row >= 1, "rotation window starts before the table");
        assert!(row + count <= self.entities.len(), "rotation window out of bounds");
        self.entities[row - 1..row + count].rotate_left(1);
        for column in &mut self.columns {
            column.rotate_back(row, count);
        }
    }

    /// Reserve capacity for exactly `count` rows in the entity column and in
    /// every data-bearing component column. Length is unchanged.
    pub(crate) fn set_size(&mut self, count: usize) {
        let additional = count.saturating_sub(self.entities.len());
        self.entities.reserve_exact(additional);
        for column in &mut self.columns {
            column.set_size(count);
        }
    }

    /// Free every column buffer, including the entity column.
    pub(crate) fn clear(&mut self) {
        self.entities = Vec::new();
        for column in &mut self.columns {
            column.clear();
        }
    }

    /// Merge the entity column of `src` onto this one, emptying `src`. An
    /// empty destination takes the source allocation without copying.
    pub(crate) fn merge_entities(&mut self, src: &mut TableData) {
        if self.entities.is_empty() {
            mem::swap(&mut self.entities, &mut src.entities);
        } else {
            self.entities.append(&mut src.entities);
        }
    }
}
