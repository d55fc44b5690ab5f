//! Archetype tables.
//!
//! A [`Table`] stores every entity of one archetype: its identity is an
//! immutable [`Kind`], its body is a committed [`TableData`], and it carries
//! the ids of the queries subscribed to it. All structural mutation of
//! component storage funnels through here.
//!
//! Three cross-cutting rules shape every operation:
//!
//! - **Working-data resolution.** While the world is in progress, mutations
//!   land in the calling stage's shadow body for this table's kind instead of
//!   the committed body, and activation is suppressed. The committed body is
//!   only touched outside in-progress mode.
//! - **Entity-index coherence.** Any operation that moves a row (swap-remove,
//!   swap, rotation, merge) rewrites the affected entities' records in the
//!   stage's entity index. Records are 1-based; merge is the single,
//!   deliberate exception.
//! - **Edge-triggered activation.** Queries are signaled exactly when the
//!   committed body crosses the empty/non-empty boundary, after the
//!   structural change is complete.

use std::cmp::Ordering;

use log::{trace, warn};

use crate::{
    entity::{self, Entity},
    kind::Kind,
    query,
    stage::Stage,
    storage::{
        data::TableData,
        index::{EntityIndex, Record},
        row::Row,
    },
    world::World,
};

/// A stable table identifier, assigned by the table registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(u32);

impl Id {
    /// Create a table id from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    /// The index of this id in the table registry.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Properties derived from a table's kind when its body is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags(u32);

impl Flags {
    /// No special properties.
    pub const NONE: Flags = Flags(0);

    /// The kind contains at least one reserved builtin id.
    pub const HAS_BUILTINS: Flags = Flags(1);

    /// The kind contains the prefab tag.
    pub const IS_PREFAB: Flags = Flags(1 << 1);

    /// Whether every bit of `other` is set.
    #[inline]
    pub fn contains(&self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Derive the flags for a kind.
    fn from_kind(kind: &Kind) -> Flags {
        let mut flags = Flags::NONE.0;
        for &id in kind.ids() {
            if id.is_builtin() {
                flags |= Flags::HAS_BUILTINS.0;
            }
            if id == entity::PREFAB {
                flags |= Flags::IS_PREFAB.0;
            }
        }
        Flags(flags)
    }
}

/// The storage container for one archetype.
pub struct Table {
    /// Registry-assigned identifier.
    id: Id,

    /// The ordered component-id set this table stores. Never changes;
    /// changing an entity's components means moving it between tables.
    kind: Kind,

    /// The committed body.
    data: TableData,

    /// Properties derived from the kind at creation.
    flags: Flags,

    /// Queries subscribed to this table's activation signals.
    queries: Vec<query::Id>,
}

impl Table {
    /// Create a table for `kind`, allocating its committed body from the
    /// world's component descriptors.
    pub fn new(world: &World, id: Id, kind: Kind) -> Self {
        let data = TableData::new(
            world.components(),
            &kind,
            world.config().column_growth.clone(),
        );
        let flags = Flags::from_kind(&kind);
        Self {
            id,
            kind,
            data,
            flags,
            queries: Vec::new(),
        }
    }

    /// This table's identifier.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// This table's kind.
    #[inline]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Properties derived from the kind.
    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Number of committed rows.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// Whether the committed body holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The committed body.
    #[inline]
    pub fn data(&self) -> &TableData {
        &self.data
    }

    /// The committed body, mutably. Callers use this to write component
    /// values into freshly inserted rows.
    #[inline]
    pub fn data_mut(&mut self) -> &mut TableData {
        &mut self.data
    }

    /// The queries subscribed to this table.
    #[inline]
    pub fn queries(&self) -> &[query::Id] {
        &self.queries
    }

    /// The body mutations should target right now: the committed body, or
    /// the stage's shadow for this kind (created on first use) while the
    /// world is in progress.
    pub fn working_data<'a>(&'a mut self, world: &World, stage: &'a mut Stage) -> &'a mut TableData {
        if world.in_progress() {
            let growth = world.config().column_growth.clone();
            stage.working_parts(world.components(), &self.kind, growth).0
        } else {
            &mut self.data
        }
    }

    /// Append a row for `entity`, leaving its component slots uninitialized
    /// for the caller to write. Returns the new row.
    ///
    /// Outside in-progress mode this activates subscribed queries when the
    /// table gains its first row, and flags `world.should_resolve` when any
    /// committed column buffer reallocated.
    pub fn insert(&mut self, world: &mut World, stage: &mut Stage, entity: Entity) -> Row {
        if world.in_progress() {
            let growth = world.config().column_growth.clone();
            let (data, _) = stage.working_parts(world.components(), &self.kind, growth);
            data.push(entity).0
        } else {
            let (row, reallocated) = self.data.push(entity);
            if row.index() == 0 {
                self.activate(world.queries_mut(), None, true);
            }
            if reallocated {
                world.mark_should_resolve();
            }
            row
        }
    }

    /// Append `count` rows with consecutive entity ids starting at `first`,
    /// leaving component slots uninitialized. Returns the first new row.
    ///
    /// Activation and reallocation signaling as for [`insert`](Self::insert).
    pub fn grow(
        &mut self,
        world: &mut World,
        stage: &mut Stage,
        first: Entity,
        count: usize,
    ) -> Row {
        if world.in_progress() {
            let growth = world.config().column_growth.clone();
            let (data, _) = stage.working_parts(world.components(), &self.kind, growth);
            data.grow(first, count).0
        } else {
            let (first_row, reallocated) = self.data.grow(first, count);
            if self.data.len() == count {
                self.activate(world.queries_mut(), None, true);
            }
            if reallocated {
                world.mark_should_resolve();
            }
            first_row
        }
    }

    /// Remove the row at `row` by swap-remove: the last row is moved into
    /// its place and the moved entity's record is updated in the stage's
    /// entity index. Deactivates subscribed queries when the table empties
    /// outside in-progress mode.
    ///
    /// # Panics
    /// Panics if the working body is empty or `row` is out of bounds.
    pub fn delete(&mut self, world: &mut World, stage: &mut Stage, row: Row) {
        if world.in_progress() {
            let growth = world.config().column_growth.clone();
            let (data, index) = stage.working_parts(world.components(), &self.kind, growth);
            delete_in(data, index, self.id, row);
        } else {
            let emptied = delete_in(&mut self.data, stage.entity_index_mut(), self.id, row);
            if emptied {
                self.activate(world.queries_mut(), None, false);
            }
        }
    }

    /// Reserve capacity for exactly `count` rows in the working body without
    /// changing its length. Pre-sizing this way keeps later inserts from
    /// reallocating, and therefore from flagging `should_resolve`.
    pub fn set_size(&mut self, world: &World, stage: &mut Stage, count: usize) {
        if world.in_progress() {
            let growth = world.config().column_growth.clone();
            let (data, _) = stage.working_parts(world.components(), &self.kind, growth);
            data.set_size(count);
        } else {
            self.data.set_size(count);
        }
    }

    /// Exchange two rows across every column and update both entities'
    /// records. No-op when `r1 == r2`.
    pub fn swap(&mut self, world: &World, stage: &mut Stage, r1: Row, r2: Row) {
        if r1 == r2 {
            return;
        }
        if world.in_progress() {
            let growth = world.config().column_growth.clone();
            let (data, index) = stage.working_parts(world.components(), &self.kind, growth);
            swap_in(data, index, self.id, r1, r2);
        } else {
            swap_in(&mut self.data, stage.entity_index_mut(), self.id, r1, r2);
        }
    }

    /// Rotate the window of `count` rows starting at `row` leftward by one:
    /// the row at `row - 1` moves behind the window to `row + count - 1`.
    /// Every moved entity's record is updated.
    pub fn move_back_and_swap(
        &mut self,
        world: &World,
        stage: &mut Stage,
        row: usize,
        count: usize,
    ) {
        if world.in_progress() {
            let growth = world.config().column_growth.clone();
            let (data, index) = stage.working_parts(world.components(), &self.kind, growth);
            rotate_in(data, index, self.id, row, count);
        } else {
            rotate_in(&mut self.data, stage.entity_index_mut(), self.id, row, count);
        }
    }

    /// Free every committed column buffer without running remove handlers,
    /// deactivating subscribed queries if rows were present. Used to restore
    /// a table to a previous state (rollback).
    pub fn clear(&mut self, world: &mut World) {
        let count = self.data.len();
        self.data.clear();
        if count > 0 {
            self.activate(world.queries_mut(), None, false);
        }
    }

    /// Replace the committed body wholesale, dropping the previous body and
    /// its buffers. Signals activation if the table went empty→non-empty and
    /// deactivation for the reverse. This is how the commit phase folds a
    /// stage shadow into a table.
    pub fn replace_columns(&mut self, world: &mut World, data: TableData) {
        let previous = self.data.len();
        self.data = data;
        let count = self.data.len();

        if previous == 0 && count > 0 {
            self.activate(world.queries_mut(), None, true);
        } else if previous > 0 && count == 0 {
            self.activate(world.queries_mut(), None, false);
        }
    }

    /// Publish a remove notification covering every committed row, if any.
    /// The external dispatcher runs component remove handlers off it.
    pub fn deinit(&self, world: &World) {
        let count = self.data.len();
        if count > 0 {
            world.events().notify(crate::event::Removed {
                table: self.id,
                kind: self.kind.clone(),
                start_row: 0,
                count,
            });
        }
    }

    /// Remove every row: publish the remove notification, then free the
    /// column buffers and deactivate.
    pub fn delete_all(&mut self, world: &mut World) {
        self.deinit(world);
        self.clear(world);
    }

    /// Consume the table, freeing its body and query subscriptions without
    /// remove notifications or activation signals. Used during world
    /// teardown; dropping the table is equivalent.
    pub fn free(self) {}

    /// Subscribe `query` to this table's activation signals. If the table is
    /// already populated the query is activated immediately.
    pub fn register_query(&mut self, world: &mut World, query: query::Id) {
        if self.queries.contains(&query) {
            warn!("query {:?} registered twice with table {:?}", query, self.id);
        }
        self.queries.push(query);

        if !self.data.is_empty() {
            self.activate(world.queries_mut(), Some(query), true);
        }
    }

    /// Move every row of `old_table` into `new_table`, appending.
    ///
    /// `new_table`'s kind must contain `old_table`'s kind; extra components
    /// of the new kind must sort after the shared ones. Columns present in
    /// both kinds are merged per column (transplanting the allocation when
    /// the destination is empty); old columns with no destination are freed;
    /// new-only columns gain uninitialized slots for the caller to write.
    /// Relation ids carry no columns and end the walk.
    ///
    /// Every moved entity's record is rewritten against `stage`'s entity
    /// index — with 0-based rows, unlike every other path. The external
    /// commit phase was written against that convention, so it is preserved
    /// rather than corrected; the tests pin it down.
    ///
    /// Passing `None` for `new_table` deletes all rows of `old_table` and
    /// drops the moved entities' records instead.
    ///
    /// No activation is signaled in either direction; the commit phase
    /// driving merges reconciles query state itself.
    ///
    /// # Panics
    /// Panics if the kinds are equal or the superset precondition is
    /// violated.
    pub fn merge(
        world: &mut World,
        stage: &mut Stage,
        new_table: Option<&mut Table>,
        old_table: &mut Table,
    ) {
        let Some(new_table) = new_table else {
            for &entity in old_table.data.entities() {
                stage.entity_index_mut().remove(entity);
            }
            old_table.delete_all(world);
            return;
        };

        assert!(
            new_table.kind != old_table.kind,
            "merge requires distinct table kinds"
        );

        let old_count = old_table.data.len();
        let new_count = new_table.data.len();

        // Records are written 0-based here, unlike every other path.
        let index = stage.entity_index_mut();
        for (i, &entity) in old_table.data.entities().iter().enumerate() {
            index.set(
                entity,
                Record {
                    table: new_table.id,
                    row: i + new_count,
                },
            );
        }

        if old_count == 0 {
            return;
        }

        let mut i_new = 0;
        let mut i_old = 0;
        while i_new < new_table.kind.len() && i_old < old_table.kind.len() {
            let new_id = new_table.kind.ids()[i_new];
            let old_id = old_table.kind.ids()[i_old];

            // Relation ids sort last and carry no columns.
            if new_id.is_relation() || old_id.is_relation() {
                break;
            }

            match new_id.cmp(&old_id) {
                Ordering::Equal => {
                    let src = old_table
                        .data
                        .column_mut(i_old)
                        .expect("columns parallel kind");
                    let dst = new_table
                        .data
                        .column_mut(i_new)
                        .expect("columns parallel kind");
                    dst.merge_from(src);
                    i_new += 1;
                    i_old += 1;
                }
                Ordering::Less => {
                    panic!("merge target kind is not a superset of the source kind");
                }
                Ordering::Greater => {
                    // The old column has no destination in the new table.
                    old_table
                        .data
                        .column_mut(i_old)
                        .expect("columns parallel kind")
                        .clear();
                    i_old += 1;
                }
            }
        }

        // New-kind columns with no source counterpart still need the merged
        // row count; the caller writes the new slots.
        while i_new < new_table.kind.len() {
            if new_table.kind.ids()[i_new].is_relation() {
                break;
            }
            new_table
                .data
                .column_mut(i_new)
                .expect("columns parallel kind")
                .grow_uninit(old_count);
            i_new += 1;
        }

        new_table.data.merge_entities(&mut old_table.data);

        trace!(
            "merged {} rows from table {:?} into table {:?}",
            old_count, old_table.id, new_table.id
        );
    }

    /// Signal activation to one query or to every subscribed query.
    fn activate(&self, queries: &mut query::Registry, query: Option<query::Id>, active: bool) {
        match query {
            Some(query) => queries.activate(query, self.id, active),
            None => {
                for &query in &self.queries {
                    queries.activate(query, self.id, active);
                }
            }
        }
    }
}

/// Swap-remove `row` and record the moved entity's new 1-based row.
/// Returns whether the body is now empty.
fn delete_in(data: &mut TableData, index: &mut EntityIndex, table: Id, row: Row) -> bool {
    if let Some(moved) = data.swap_remove(row) {
        index.set(
            moved,
            Record {
                table,
                row: row.index() + 1,
            },
        );
    }
    data.is_empty()
}

/// Exchange two rows and rewrite both entities' records.
fn swap_in(data: &mut TableData, index: &mut EntityIndex, table: Id, r1: Row, r2: Row) {
    let (e1, e2) = data.swap(r1, r2);
    index.set(
        e1,
        Record {
            table,
            row: r2.index() + 1,
        },
    );
    index.set(
        e2,
        Record {
            table,
            row: r1.index() + 1,
        },
    );
}

/// Rotate the window and rewrite the record of every entity it touched.
fn rotate_in(data: &mut TableData, index: &mut EntityIndex, table: Id, row: usize, count: usize) {
    data.rotate_back(row, count);
    for r in row - 1..row + count {
        let entity = data.entities()[r];
        index.set(entity, Record { table, row: r + 1 });
    }
}
