//! Shared fixtures for the storage benchmarks.
//!
//! Benchmarks work against a fixed archetype: an 8-byte component, a 4-byte
//! component and a tag, which exercises the data-bearing and bufferless
//! column paths together.

use strata::{
    entity::Entity,
    kind::Kind,
    stage::Stage,
    storage::{Table, table},
    world::World,
};

/// 8-byte benchmark component.
pub const POSITION: Entity = Entity::new(1000);

/// 4-byte benchmark component.
pub const HEALTH: Entity = Entity::new(1001);

/// Tag benchmark component.
pub const STATIC: Entity = Entity::new(1002);

/// A world with the benchmark components registered, plus a fresh stage.
pub fn world() -> (World, Stage) {
    let world = World::new();
    world.components().register(POSITION, 8);
    world.components().register(HEALTH, 4);
    world.components().register_tag(STATIC);
    (world, Stage::new())
}

/// The full benchmark kind: [POSITION, HEALTH, STATIC].
pub fn kind() -> Kind {
    Kind::new(vec![POSITION, HEALTH, STATIC])
}

/// The subset kind: [POSITION].
pub fn subset_kind() -> Kind {
    Kind::new(vec![POSITION])
}

/// A table over the given kind.
pub fn table(world: &World, id: u32, kind: Kind) -> Table {
    Table::new(world, table::Id::new(id), kind)
}

/// Insert `count` rows with consecutive entity ids starting at 1.
pub fn fill(world: &mut World, stage: &mut Stage, table: &mut Table, count: usize) {
    for id in 1..=count as u64 {
        table.insert(world, stage, Entity::new(id));
    }
}
