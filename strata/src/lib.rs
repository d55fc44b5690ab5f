//! Archetype table storage for an Entity Component System.
//!
//! A world of entities is partitioned into archetypes: groups of entities
//! that share exactly the same set of component ids. Each archetype is backed
//! by a [`storage::Table`] that stores component values column-major, one
//! packed byte array per component id, indexed by a dense row number. The
//! per-stage entity index maps every entity back to its current (table, row)
//! pair.
//!
//! # Architecture
//!
//! - **[`entity`]**: opaque 64-bit entity handles, relation-id flag bits and
//!   the reserved builtin ids.
//! - **[`kind`]**: the ordered, duplicate-free component-id list that is a
//!   table's identity.
//! - **[`component`]**: the descriptor registry mapping component ids to
//!   element sizes.
//! - **[`storage`]**: columns, table data, tables and the entity index.
//! - **[`stage`]**: the per-worker shadow store that isolates in-progress
//!   mutations from the committed world.
//! - **[`query`]**: query handles and the activation state the storage layer
//!   signals into.
//! - **[`event`]**: the remove-notification channel fired when populated
//!   tables are torn down.
//! - **[`world`]**: the context handle tying the collaborators together.

pub mod component;
pub mod entity;
pub mod event;
pub mod kind;
pub mod query;
pub mod stage;
pub mod storage;
pub mod world;
