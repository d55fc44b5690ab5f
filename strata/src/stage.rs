//! Per-worker staging context.
//!
//! While the world is in progress, structural mutations must not disturb the
//! committed tables being iterated. Each worker owns a [`Stage`]: a map from
//! table kind to a shadow [`TableData`] that absorbs the worker's mutations,
//! plus a per-stage entity index overlaying the main one. Shadows are created
//! lazily on first mutation (copy-on-write at table granularity: a fresh
//! empty body, not a copy of the committed rows).
//!
//! When the frame ends, an external commit phase drains each shadow with
//! [`take_data`](Stage::take_data) and folds it into the committed table via
//! `replace_columns` or `merge`.

use std::collections::HashMap;

use crate::{
    component,
    kind::Kind,
    storage::{EntityIndex, TableData, mem::GrowthStrategy},
};

/// One worker's view of in-progress mutations.
#[derive(Default)]
pub struct Stage {
    /// Entity records written by this stage's mutations. For the main stage
    /// this is the authoritative index; worker stages overlay it.
    pub(crate) entity_index: EntityIndex,

    /// Shadow table bodies, keyed by table kind.
    pub(crate) data_stage: HashMap<Kind, TableData>,
}

impl Stage {
    /// Create an empty stage.
    pub fn new() -> Self {
        Self {
            entity_index: EntityIndex::new(),
            data_stage: HashMap::new(),
        }
    }

    /// This stage's entity index.
    #[inline]
    pub fn entity_index(&self) -> &EntityIndex {
        &self.entity_index
    }

    /// This stage's entity index, mutably.
    #[inline]
    pub fn entity_index_mut(&mut self) -> &mut EntityIndex {
        &mut self.entity_index
    }

    /// The shadow body for `kind`, if one has been created.
    #[inline]
    pub fn shadow(&self, kind: &Kind) -> Option<&TableData> {
        self.data_stage.get(kind)
    }

    /// Number of shadow bodies held by this stage.
    #[inline]
    pub fn shadow_count(&self) -> usize {
        self.data_stage.len()
    }

    /// Remove and return the shadow body for `kind`. The commit phase calls
    /// this to fold a shadow back into its committed table.
    pub fn take_data(&mut self, kind: &Kind) -> Option<TableData> {
        self.data_stage.remove(kind)
    }

    /// Discard every shadow body, keeping the entity index. Used when an
    /// in-progress frame is rolled back instead of committed.
    pub fn discard_shadows(&mut self) {
        self.data_stage.clear();
    }

    /// The shadow body for `kind` together with this stage's entity index,
    /// creating the shadow if this is the first mutation against it. Borrows
    /// both halves disjointly so row moves can update records while the body
    /// is held.
    pub(crate) fn working_parts(
        &mut self,
        components: &component::Registry,
        kind: &Kind,
        growth: GrowthStrategy,
    ) -> (&mut TableData, &mut EntityIndex) {
        if !self.data_stage.contains_key(kind) {
            self.data_stage
                .insert(kind.clone(), TableData::new(components, kind, growth));
        }
        let data = self
            .data_stage
            .get_mut(kind)
            .expect("shadow inserted above");
        (data, &mut self.entity_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    fn fixture() -> (component::Registry, Kind) {
        let registry = component::Registry::new();
        let position = Entity::new(100);
        registry.register(position, 8);
        (registry, Kind::new(vec![position]))
    }

    #[test]
    fn working_parts_creates_one_shadow_per_kind() {
        // Given
        let (components, kind) = fixture();
        let mut stage = Stage::new();

        // When - first resolution creates the shadow
        {
            let (data, _) = stage.working_parts(&components, &kind, GrowthStrategy::Multiply(2));
            data.push(Entity::new(1));
        }

        // Then - second resolution returns the same shadow
        let (data, _) = stage.working_parts(&components, &kind, GrowthStrategy::Multiply(2));
        assert_eq!(data.len(), 1);
        assert_eq!(stage.shadow_count(), 1);
    }

    #[test]
    fn take_data_removes_the_shadow() {
        // Given
        let (components, kind) = fixture();
        let mut stage = Stage::new();
        {
            let (data, _) = stage.working_parts(&components, &kind, GrowthStrategy::Multiply(2));
            data.push(Entity::new(7));
        }

        // When
        let taken = stage.take_data(&kind).unwrap();

        // Then
        assert_eq!(taken.len(), 1);
        assert!(stage.shadow(&kind).is_none());
        assert!(stage.take_data(&kind).is_none());
    }

    #[test]
    fn discard_shadows_keeps_the_entity_index() {
        // Given
        let (components, kind) = fixture();
        let mut stage = Stage::new();
        stage.working_parts(&components, &kind, GrowthStrategy::Multiply(2));
        stage.entity_index_mut().set(
            Entity::new(1),
            crate::storage::Record {
                table: crate::storage::table::Id::new(0),
                row: 1,
            },
        );

        // When
        stage.discard_shadows();

        // Then
        assert_eq!(stage.shadow_count(), 0);
        assert!(stage.entity_index().contains(Entity::new(1)));
    }
}
