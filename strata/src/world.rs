//! The world context.
//!
//! [`World`] bundles the collaborators the storage layer talks to: the
//! component-descriptor registry, the query registry that receives activation
//! signals, the remove-notification channel, and the two scalar flags that
//! gate staging (`in_progress`) and pointer-cache invalidation
//! (`should_resolve`). There is deliberately no process-global state; every
//! operation receives the world it acts in.
//!
//! Stages are *not* owned by the world: the scheduler that drives in-progress
//! mode hands each worker its own [`Stage`](crate::stage::Stage) and passes
//! the main stage where an operation needs the authoritative entity index.

use crate::{component, entity, event, query, storage::mem::GrowthStrategy};

/// Storage tuning for a world.
#[derive(Debug, Clone)]
pub struct Config {
    /// Growth strategy applied to new column buffers.
    pub column_growth: GrowthStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            column_growth: GrowthStrategy::Multiply(2),
        }
    }
}

/// The context shared by every storage operation.
pub struct World {
    /// Component descriptors by component id.
    components: component::Registry,

    /// Queries and their activation state.
    queries: query::Registry,

    /// Remove-notification channel.
    events: event::Events,

    /// Storage tuning.
    config: Config,

    /// While set, mutations target per-stage shadows and activation is
    /// suppressed.
    in_progress: bool,

    /// Set when committed column storage reallocated; callers caching raw
    /// column pointers must refresh them.
    should_resolve: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a world with default storage tuning.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a world with the given storage tuning.
    pub fn with_config(config: Config) -> Self {
        let components = component::Registry::new();
        components.register(entity::COMPONENT, std::mem::size_of::<component::Info>());
        components.register_tag(entity::PREFAB);
        Self {
            components,
            queries: query::Registry::new(),
            events: event::Events::new(),
            config,
            in_progress: false,
            should_resolve: false,
        }
    }

    /// The component-descriptor registry.
    #[inline]
    pub fn components(&self) -> &component::Registry {
        &self.components
    }

    /// The query registry.
    #[inline]
    pub fn queries(&self) -> &query::Registry {
        &self.queries
    }

    /// The query registry, mutably.
    #[inline]
    pub fn queries_mut(&mut self) -> &mut query::Registry {
        &mut self.queries
    }

    /// The remove-notification channel.
    #[inline]
    pub fn events(&self) -> &event::Events {
        &self.events
    }

    /// The storage tuning.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether mutations currently target per-stage shadows.
    #[inline]
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Enter or leave in-progress mode. Driven by the external scheduler
    /// around each frame.
    #[inline]
    pub fn set_in_progress(&mut self, in_progress: bool) {
        self.in_progress = in_progress;
    }

    /// Whether committed column storage reallocated since the flag was last
    /// taken.
    #[inline]
    pub fn should_resolve(&self) -> bool {
        self.should_resolve
    }

    /// Read and clear the reallocation flag.
    #[inline]
    pub fn take_should_resolve(&mut self) -> bool {
        std::mem::take(&mut self.should_resolve)
    }

    /// Flag that committed column storage reallocated.
    #[inline]
    pub(crate) fn mark_should_resolve(&mut self) {
        self.should_resolve = true;
    }
}
