//! Table type identity.
//!
//! A [`Kind`] is the ordered, duplicate-free list of component ids that
//! defines an archetype. Two tables with an equal `Kind` store the same
//! archetype, which makes `Kind` the hash key for both the table registry and
//! the per-stage shadow-data map.

use crate::entity::Entity;

/// The ordered set of component ids stored by one table.
///
/// Ids are kept sorted by their raw 64-bit value and deduplicated, so any two
/// `Kind` values built from the same id set compare and hash equal. The sort
/// order is load-bearing: table merge walks two kinds in parallel and relies
/// on the shared total order, and relation ids (high flag bits) always land
/// at the tail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Kind {
    ids: Vec<Entity>,
}

impl Kind {
    /// Construct a kind from the given component ids, sorting and removing
    /// duplicates.
    #[inline]
    pub fn new(ids: impl Into<Vec<Entity>>) -> Self {
        let mut ids = ids.into();
        ids.sort();
        ids.dedup();
        ids.shrink_to_fit();
        Self { ids }
    }

    /// The component ids in this kind, in sorted order.
    #[inline]
    pub fn ids(&self) -> &[Entity] {
        &self.ids
    }

    /// The number of ids in this kind, which is also the table's column
    /// count.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether this kind has no ids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether this kind contains the given id.
    #[inline]
    pub fn contains(&self, id: Entity) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Whether this kind contains every id of `other`.
    #[inline]
    pub fn is_superset_of(&self, other: &Kind) -> bool {
        other.ids.iter().all(|&id| self.contains(id))
    }

    /// A new kind containing the union of both id sets.
    #[inline]
    pub fn merged(&self, other: &Kind) -> Self {
        let mut ids = self.ids.clone();
        ids.extend_from_slice(&other.ids);
        Self::new(ids)
    }
}
