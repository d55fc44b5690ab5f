//! Entity handles.
//!
//! An [`Entity`] is an opaque 64-bit handle. The two highest bits are
//! relation flags: an id with any flag bit set expresses a relationship to
//! another entity (a parent link, a prefab instance link) instead of naming a
//! component. Relation ids may appear in a table's [`Kind`](crate::kind::Kind)
//! but carry no component descriptor and no column storage.
//!
//! A small range of low ids is reserved for builtin component ids; tables
//! containing any of them are flagged so the runtime can treat them
//! specially.

/// An opaque 64-bit entity identifier.
///
/// The ordering on `Entity` is the ordering on the raw id value. It is the
/// total order every [`Kind`](crate::kind::Kind) is sorted by, which places
/// relation ids (high flag bits set) after all plain component ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u64);

/// Flag bit marking an id as an instance-of relation to a prefab.
pub const INSTANCE_OF: u64 = 1 << 63;

/// Flag bit marking an id as a child-of relation to a parent entity.
pub const CHILD_OF: u64 = 1 << 62;

/// The bits that mark an id as a relation id rather than a component id.
pub const FLAGS_MASK: u64 = INSTANCE_OF | CHILD_OF;

/// Builtin component id describing components themselves.
pub const COMPONENT: Entity = Entity(1);

/// Builtin tag marking an entity as a prefab.
pub const PREFAB: Entity = Entity(2);

/// The highest reserved builtin id. Tables containing any id at or below
/// this are flagged with `HAS_BUILTINS`.
pub const LAST_BUILTIN: Entity = PREFAB;

impl Entity {
    /// Construct an entity handle from a raw id value.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Entity(id)
    }

    /// Get the raw 64-bit id value.
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Whether any relation flag bit is set on this id.
    #[inline]
    pub const fn is_relation(&self) -> bool {
        self.0 & FLAGS_MASK != 0
    }

    /// Whether this id falls in the reserved builtin range.
    #[inline]
    pub const fn is_builtin(&self) -> bool {
        self.0 <= LAST_BUILTIN.0
    }

    /// The id `count` steps after this one. Bulk row growth assigns
    /// consecutive ids starting from a first entity.
    #[inline]
    pub const fn offset(&self, count: u64) -> Self {
        Entity(self.0 + count)
    }

    /// A child-of relation id pointing at `parent`.
    #[inline]
    pub const fn child_of(parent: Entity) -> Self {
        Entity(CHILD_OF | parent.0)
    }

    /// An instance-of relation id pointing at `base`.
    #[inline]
    pub const fn instance_of(base: Entity) -> Self {
        Entity(INSTANCE_OF | base.0)
    }
}

impl From<u64> for Entity {
    fn from(value: u64) -> Self {
        Entity(value)
    }
}
