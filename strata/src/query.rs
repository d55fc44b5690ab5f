//! Query handles and activation state.
//!
//! The storage layer does not iterate anything itself; it signals queries
//! when a table they subscribed to crosses the empty/non-empty boundary, and
//! the query side owns the resulting state. A table holds the ids of the
//! queries subscribed to it, a query holds the set of tables it currently
//! iterates, and activation is the message between the two. Neither side
//! owns the other.
//!
//! The query *language* lives outside this crate; [`Query`] here is only the
//! activation-state owner that the table contract requires.

use fixedbitset::FixedBitSet;
use log::trace;

use crate::storage::table;

/// A stable query identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(u32);

impl Id {
    /// Create a query id from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    /// The index of this id in the query registry.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// The activation state of one query: which tables it should iterate.
///
/// Bit `n` set means the table with id `n` is non-empty and active for this
/// query. The signal counters exist for diagnostics and let tests pin down
/// the edge-triggered contract: activations minus deactivations for a table
/// is 1 while it is non-empty and 0 once it empties.
#[derive(Debug, Default)]
pub struct Query {
    /// Active tables, indexed by table id.
    active: FixedBitSet,

    /// Total activation signals received.
    activations: u64,

    /// Total deactivation signals received.
    deactivations: u64,
}

impl Query {
    /// Whether `table` is currently active for this query.
    #[inline]
    pub fn is_active(&self, table: table::Id) -> bool {
        self.active.contains(table.index())
    }

    /// Number of tables currently active for this query.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active.count_ones(..)
    }

    /// Total activation signals received.
    #[inline]
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Total deactivation signals received.
    #[inline]
    pub fn deactivations(&self) -> u64 {
        self.deactivations
    }
}

/// Registry of all queries known to a world.
#[derive(Debug, Default)]
pub struct Registry {
    queries: Vec<Query>,
}

impl Registry {
    /// Create an empty query registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            queries: Vec::new(),
        }
    }

    /// Create a new query and return its id.
    pub fn create(&mut self) -> Id {
        let id = Id(self.queries.len() as u32);
        self.queries.push(Query::default());
        id
    }

    /// The query with the given id, if it exists.
    #[inline]
    pub fn get(&self, id: Id) -> Option<&Query> {
        self.queries.get(id.index())
    }

    /// Number of queries in the registry.
    #[inline]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the registry holds no queries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Deliver an activation signal: mark `table` active or inactive for
    /// `query`.
    ///
    /// # Panics
    /// Panics if `query` is not a valid id in this registry.
    pub fn activate(&mut self, query: Id, table: table::Id, active: bool) {
        trace!("table {:?} {} for query {:?}", table, if active { "activated" } else { "deactivated" }, query);
        let entry = self
            .queries
            .get_mut(query.index())
            .expect("activation for an unknown query");
        entry.active.grow(table.index() + 1);
        entry.active.set(table.index(), active);
        if active {
            entry.activations += 1;
        } else {
            entry.deactivations += 1;
        }
    }
}
