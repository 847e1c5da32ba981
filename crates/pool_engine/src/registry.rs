//! Tag-indexed pool registry and the spawn entry point
//!
//! The registry owns every pool and routes spawn requests by tag. It is
//! built once at startup from a validated [`PoolManifest`] and passed
//! explicitly to whoever spawns - there is no global accessor.

use std::collections::HashMap;

use thiserror::Error;

use crate::config::{ConfigError, PoolManifest};
use crate::pool::{Pool, PoolError};
use crate::scene::{InstanceHandle, InstanceHost, Placement};

/// Errors from spawn requests
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// Spawn requested for a tag with no registered pool
    #[error("no pool registered under tag '{tag}'")]
    UnknownTag {
        /// The unregistered tag
        tag: String,
    },

    /// The pool itself failed
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Owns all pools and routes spawn requests by tag
pub struct PoolRegistry {
    pools: HashMap<String, Pool>,
}

impl PoolRegistry {
    /// Build a registry from a manifest, eagerly populating every pool
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when the manifest fails validation
    /// (duplicate or empty tags, empty prototype, cap below initial size).
    /// No instance is created on a validation failure.
    pub fn initialize(
        manifest: &PoolManifest,
        host: &mut dyn InstanceHost,
    ) -> Result<Self, ConfigError> {
        manifest.validate()?;

        let mut pools = HashMap::with_capacity(manifest.pools.len());
        for spec in &manifest.pools {
            let mut pool = Pool::new(spec.clone());
            pool.initialize(host);
            if pools.insert(spec.tag.clone(), pool).is_some() {
                // Unreachable past validate(); kept so a future manifest
                // source cannot silently overwrite a pool.
                return Err(ConfigError::Invalid(format!(
                    "duplicate pool tag '{}'",
                    spec.tag
                )));
            }
        }

        log::info!("initialized pool registry with {} pools", pools.len());
        Ok(Self { pools })
    }

    /// Spawn a pooled instance by tag
    ///
    /// Looks up the pool, refills it (best effort) when the front instance
    /// is still active, takes the front instance, applies the placement,
    /// and requeues the instance at the tail.
    ///
    /// The instance is parented, positioned, and rotated but deliberately
    /// NOT activated; activation is the caller's (or the owning engine
    /// system's) responsibility.
    ///
    /// Failures - unknown tag, empty pool, corrupt handle - emit one
    /// warning and return `None`; they are never fatal to the registry or
    /// to other pools, and there is no retry beyond the single refill
    /// attempt.
    pub fn spawn(
        &mut self,
        host: &mut dyn InstanceHost,
        tag: &str,
        placement: Placement,
    ) -> Option<InstanceHandle> {
        match self.try_spawn(host, tag, placement) {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("spawn failed: {err}");
                None
            }
        }
    }

    /// [`PoolRegistry::spawn`], but surfacing the failure as an error
    /// instead of logging it
    ///
    /// # Errors
    ///
    /// [`SpawnError::UnknownTag`] for an unregistered tag,
    /// [`PoolError::EmptyPool`] for a pool with no instances, and
    /// [`PoolError::CorruptPool`] when the acquired handle is unknown to
    /// the host.
    pub fn try_spawn(
        &mut self,
        host: &mut dyn InstanceHost,
        tag: &str,
        placement: Placement,
    ) -> Result<InstanceHandle, SpawnError> {
        let pool = self.pools.get_mut(tag).ok_or_else(|| SpawnError::UnknownTag {
            tag: tag.to_string(),
        })?;

        // An empty pool reports before any refill attempt.
        pool.peek()?;

        // Front instance still active: assume the whole pool is in use and
        // grow it. May be a no-op if refilling is disabled or capped.
        if pool.looks_exhausted(host) {
            pool.refill(host);
        }

        let handle = pool.acquire_front()?;
        if !host.contains(handle) {
            return Err(SpawnError::Pool(PoolError::CorruptPool {
                tag: tag.to_string(),
            }));
        }

        if let Some(parent) = placement.parent {
            host.set_parent(handle, parent);
        }
        host.set_position(handle, placement.position);
        host.set_rotation(handle, placement.rotation);

        pool.release_back(handle);
        Ok(handle)
    }

    /// Look up a pool by tag
    #[must_use]
    pub fn pool(&self, tag: &str) -> Option<&Pool> {
        self.pools.get(tag)
    }

    /// Look up a pool by tag, mutably
    #[must_use]
    pub fn pool_mut(&mut self, tag: &str) -> Option<&mut Pool> {
        self.pools.get_mut(tag)
    }

    /// Number of registered pools
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether the registry holds no pools
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Iterate over the registered tags
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolSpec;
    use crate::foundation::math::Vec3;
    use crate::scene::SceneHost;

    /// Warning-counting log sink, so tests can assert how many diagnostics
    /// an operation emits. Counts per thread: the warning is logged on the
    /// thread that called `spawn`, so parallel tests do not interfere.
    mod diagnostics {
        use std::cell::Cell;
        use std::sync::Once;

        thread_local! {
            static WARNINGS: Cell<usize> = const { Cell::new(0) };
        }

        struct CountingLogger;

        impl log::Log for CountingLogger {
            fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
                metadata.level() <= log::Level::Warn
            }

            fn log(&self, record: &log::Record<'_>) {
                if record.level() == log::Level::Warn {
                    WARNINGS.with(|w| w.set(w.get() + 1));
                }
            }

            fn flush(&self) {}
        }

        static LOGGER: CountingLogger = CountingLogger;
        static INSTALL: Once = Once::new();

        pub fn install() {
            INSTALL.call_once(|| {
                let _ = log::set_logger(&LOGGER);
                log::set_max_level(log::LevelFilter::Warn);
            });
        }

        pub fn warnings_on_this_thread() -> usize {
            WARNINGS.with(Cell::get)
        }
    }

    fn bullet_manifest() -> PoolManifest {
        PoolManifest {
            pools: vec![PoolSpec::new("bullet", "prefabs/bullet")
                .with_initial_size(2)
                .with_refill_batch(1)
                .with_max_size(3)],
        }
    }

    fn setup(manifest: &PoolManifest) -> (PoolRegistry, SceneHost) {
        let mut host = SceneHost::new();
        let registry = PoolRegistry::initialize(manifest, &mut host).unwrap();
        (registry, host)
    }

    #[test]
    fn test_initialize_populates_pools() {
        let (registry, host) = setup(&bullet_manifest());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.pool("bullet").unwrap().len(), 2);
        assert_eq!(host.len(), 2);
    }

    #[test]
    fn test_initialize_rejects_duplicate_tags_without_instantiating() {
        let mut manifest = bullet_manifest();
        manifest.pools.push(manifest.pools[0].clone());

        let mut host = SceneHost::new();
        let result = PoolRegistry::initialize(&manifest, &mut host);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        assert!(host.is_empty());
    }

    #[test]
    fn test_unknown_tag_degrades_to_none() {
        let (mut registry, mut host) = setup(&bullet_manifest());

        assert!(registry.spawn(&mut host, "ghost", Placement::default()).is_none());
        assert!(matches!(
            registry.try_spawn(&mut host, "ghost", Placement::default()),
            Err(SpawnError::UnknownTag { tag }) if tag == "ghost"
        ));
        // Other pools are untouched.
        assert_eq!(registry.pool("bullet").unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_tag_emits_exactly_one_diagnostic() {
        diagnostics::install();
        let (mut registry, mut host) = setup(&bullet_manifest());

        let before = diagnostics::warnings_on_this_thread();
        assert!(registry.spawn(&mut host, "ghost", Placement::default()).is_none());
        assert_eq!(diagnostics::warnings_on_this_thread() - before, 1);

        // A successful spawn stays silent at warn level.
        assert!(registry.spawn(&mut host, "bullet", Placement::default()).is_some());
        assert_eq!(diagnostics::warnings_on_this_thread() - before, 1);
    }

    #[test]
    fn test_pool_mut_exposes_pool_operations() {
        let (mut registry, _host) = setup(&bullet_manifest());

        let handle = registry.pool_mut("bullet").unwrap().acquire_front().unwrap();
        assert_eq!(registry.pool("bullet").unwrap().len(), 1);

        registry.pool_mut("bullet").unwrap().release_back(handle);
        assert_eq!(registry.pool("bullet").unwrap().len(), 2);

        assert!(registry.pool_mut("ghost").is_none());
    }

    #[test]
    fn test_spawn_refill_follows_the_exhaustion_heuristic() {
        let (mut registry, mut host) = setup(&bullet_manifest());

        // Mark every pooled instance active without spawning, cycling the
        // queue so the pool keeps its order.
        while !registry.pool("bullet").unwrap().looks_exhausted(&host) {
            let pool = registry.pool_mut("bullet").unwrap();
            let handle = pool.acquire_front().unwrap();
            host.set_active(handle, true);
            pool.release_back(handle);
        }

        let before = registry.pool("bullet").unwrap().len();
        registry.spawn(&mut host, "bullet", Placement::default()).unwrap();
        assert_eq!(registry.pool("bullet").unwrap().len(), before + 1);
    }

    #[test]
    fn test_spawn_requeues_and_places() {
        let (mut registry, mut host) = setup(&bullet_manifest());
        let placement = Placement::from_position(Vec3::new(3.0, 0.0, -1.0));

        let handle = registry.spawn(&mut host, "bullet", placement).unwrap();
        let pool = registry.pool("bullet").unwrap();
        assert_eq!(pool.len(), 2);
        assert_ne!(pool.peek().unwrap(), handle);

        let instance = host.get(handle).unwrap();
        assert_eq!(instance.position, Vec3::new(3.0, 0.0, -1.0));
        // Activation is left to the caller.
        assert!(!instance.active);
    }

    #[test]
    fn test_spawn_attaches_parent_when_given() {
        let (mut registry, mut host) = setup(&bullet_manifest());
        let muzzle = host.instantiate(&"prefabs/muzzle".into());

        let handle = registry
            .spawn(&mut host, "bullet", Placement::default().with_parent(muzzle))
            .unwrap();
        assert_eq!(host.get(handle).unwrap().parent, Some(muzzle));
    }

    #[test]
    fn test_exhausted_pool_refills_once() {
        let (mut registry, mut host) = setup(&bullet_manifest());

        // Use up both initial bullets, keeping them active.
        let first = registry.spawn(&mut host, "bullet", Placement::default()).unwrap();
        host.set_active(first, true);
        let second = registry.spawn(&mut host, "bullet", Placement::default()).unwrap();
        host.set_active(second, true);
        assert_ne!(first, second);
        assert_eq!(registry.pool("bullet").unwrap().len(), 2);

        // Head is active now, so the next spawn refills before acquiring.
        let third = registry.spawn(&mut host, "bullet", Placement::default()).unwrap();
        assert_eq!(registry.pool("bullet").unwrap().len(), 3);
        assert_ne!(third, first);
        assert_ne!(third, second);
    }

    #[test]
    fn test_capped_pool_rotates_the_same_handles() {
        let manifest = PoolManifest {
            pools: vec![PoolSpec::new("bullet", "prefabs/bullet")
                .with_initial_size(2)
                .with_refill_batch(5)
                .with_max_size(2)],
        };
        let (mut registry, mut host) = setup(&manifest);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..10 {
            let handle = registry.spawn(&mut host, "bullet", Placement::default()).unwrap();
            host.set_active(handle, true);
            seen.insert(handle);
            assert_eq!(registry.pool("bullet").unwrap().len(), 2);
        }
        assert_eq!(seen.len(), 2);
    }
}
