//! # Pool Engine
//!
//! Tagged object pooling with lazy refill for game engines.
//!
//! Instances are pre-created from a prototype at startup and recycled
//! through a per-tag reuse queue instead of being instantiated and
//! destroyed at runtime. The engine side (scene graph, activation,
//! transforms) stays behind the [`scene::InstanceHost`] trait, so the
//! pooling core never touches concrete engine objects.
//!
//! ## Quick Start
//!
//! ```rust
//! use pool_engine::prelude::*;
//!
//! let manifest = PoolManifest {
//!     pools: vec![PoolSpec::new("bullet", "prefabs/bullet")
//!         .with_initial_size(4)
//!         .with_refill_batch(2)
//!         .with_max_size(16)],
//! };
//!
//! let mut host = SceneHost::new();
//! let mut registry = PoolRegistry::initialize(&manifest, &mut host)?;
//!
//! let bullet = registry
//!     .spawn(&mut host, "bullet", Placement::from_position(Vec3::new(0.0, 1.0, 0.0)))
//!     .expect("bullet pool is populated");
//!
//! // Spawning places the instance but never activates it; that is the
//! // caller's (or the owning engine system's) responsibility.
//! host.set_active(bullet, true);
//! # Ok::<(), pool_engine::config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod foundation;
pub mod pool;
pub mod registry;
pub mod scene;

pub use pool::{Pool, PoolError};
pub use registry::{PoolRegistry, SpawnError};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PoolManifest, PoolSpec},
        foundation::math::{Quat, Vec3},
        pool::{Pool, PoolError},
        registry::{PoolRegistry, SpawnError},
        scene::{InstanceHandle, InstanceHost, Placement, PrototypeId, SceneHost},
    };
}
