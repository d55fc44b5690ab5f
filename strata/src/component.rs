//! Component descriptors.
//!
//! Components are identified by entity ids; the descriptor registry maps a
//! component id to the byte size of one element of that component. An id can
//! resolve three ways:
//!
//! - a descriptor with a positive size: a data-bearing component that gets a
//!   packed column in every table whose kind contains it,
//! - a descriptor with size 0: a tag, contributing membership but no storage,
//! - no descriptor at all: a relation id, contributing neither.

use dashmap::DashMap;
use log::warn;

use crate::entity::Entity;

/// The descriptor for a registered component id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info {
    /// The component id this descriptor belongs to.
    id: Entity,

    /// Byte size of one element. Zero for tags.
    size: usize,
}

impl Info {
    /// Construct a descriptor for `id` with the given element byte size.
    #[inline]
    pub const fn new(id: Entity, size: usize) -> Self {
        Self { id, size }
    }

    /// The component id.
    #[inline]
    pub fn id(&self) -> Entity {
        self.id
    }

    /// Byte size of one element of this component.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this component carries no data.
    #[inline]
    pub fn is_tag(&self) -> bool {
        self.size == 0
    }
}

/// Thread-safe registry of component descriptors.
///
/// Reads are lock-free via a sharded concurrent map so that table
/// construction, which resolves one descriptor per kind element, never
/// contends. Registration happens through `&self` for the same reason worlds
/// share component ids: descriptors are agreed on once, then read everywhere.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: DashMap<Entity, Info>,
}

impl Registry {
    /// Create an empty descriptor registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            descriptors: DashMap::new(),
        }
    }

    /// Register a data-bearing component with the given element byte size.
    ///
    /// Re-registering an id with a different size is tolerated but almost
    /// certainly a caller bug: existing tables keep the column layout they
    /// were built with.
    pub fn register(&self, id: Entity, size: usize) -> Info {
        let info = Info::new(id, size);
        if let Some(previous) = self.descriptors.insert(id, info)
            && previous.size != size
        {
            warn!(
                "component {:?} re-registered with size {} (was {})",
                id, size, previous.size
            );
        }
        info
    }

    /// Register a tag: a component id with no data.
    #[inline]
    pub fn register_tag(&self, id: Entity) -> Info {
        self.register(id, 0)
    }

    /// Look up the descriptor for a component id.
    ///
    /// Returns `None` for ids with no descriptor (relation ids).
    #[inline]
    pub fn get(&self, id: Entity) -> Option<Info> {
        self.descriptors.get(&id).map(|entry| *entry.value())
    }

    /// The element byte size a column for `id` should use: the descriptor
    /// size for data-bearing components, zero for tags and for ids with no
    /// descriptor.
    #[inline]
    pub fn column_size(&self, id: Entity) -> usize {
        self.get(id).map(|info| info.size()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        // Given
        let registry = Registry::new();
        let position = Entity::new(100);

        // When
        registry.register(position, 8);

        // Then
        let info = registry.get(position).unwrap();
        assert_eq!(info.id(), position);
        assert_eq!(info.size(), 8);
        assert!(!info.is_tag());
    }

    #[test]
    fn tags_have_zero_size() {
        // Given
        let registry = Registry::new();
        let frozen = Entity::new(101);

        // When
        registry.register_tag(frozen);

        // Then
        let info = registry.get(frozen).unwrap();
        assert!(info.is_tag());
        assert_eq!(registry.column_size(frozen), 0);
    }

    #[test]
    fn unregistered_ids_have_no_descriptor() {
        // Given
        let registry = Registry::new();
        let relation = Entity::child_of(Entity::new(7));

        // Then
        assert!(registry.get(relation).is_none());
        assert_eq!(registry.column_size(relation), 0);
    }

    #[test]
    fn re_register_keeps_latest() {
        // Given
        let registry = Registry::new();
        let id = Entity::new(42);
        registry.register(id, 4);

        // When
        registry.register(id, 16);

        // Then
        assert_eq!(registry.get(id).unwrap().size(), 16);
    }
}
