//! Bullet pool demo
//!
//! Loads a pool manifest, builds the reference scene host, and fires
//! volleys of pooled bullets with a parented spark each. The registry is
//! constructed once here and passed explicitly to everything that spawns;
//! there is no global pool accessor.

use log::{info, warn};
use pool_engine::prelude::*;
use rand::Rng;

const VOLLEYS: usize = 4;
const BULLETS_PER_VOLLEY: usize = 6;
const SPREAD: f32 = 20.0;

/// Find the manifest whether we run from the workspace root or bullet_app/
fn manifest_path() -> &'static str {
    ["bullet_app/pools.ron", "pools.ron"]
        .into_iter()
        .find(|p| std::path::Path::new(p).exists())
        .unwrap_or("pools.ron")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pool_engine::foundation::logging::init();

    let manifest = PoolManifest::load_from_file(manifest_path())?;
    let mut host = SceneHost::new();
    let mut registry = PoolRegistry::initialize(&manifest, &mut host)?;

    let mut rng = rand::thread_rng();
    for volley in 0..VOLLEYS {
        for _ in 0..BULLETS_PER_VOLLEY {
            let position = Vec3::new(
                rng.gen_range(-SPREAD..SPREAD),
                rng.gen_range(0.0..4.0),
                rng.gen_range(-SPREAD..SPREAD),
            );
            let Some(bullet) = registry.spawn(&mut host, "bullet", Placement::from_position(position))
            else {
                warn!("bullet pool ran dry during volley {volley}");
                continue;
            };
            // Activation is the caller's job; spawning only places the instance.
            host.set_active(bullet, true);

            if let Some(spark) =
                registry.spawn(&mut host, "spark", Placement::default().with_parent(bullet))
            {
                host.set_active(spark, true);
            }
        }
        info!(
            "volley {volley} complete: bullet pool at {} instances, spark pool at {}",
            registry.pool("bullet").map_or(0, Pool::len),
            registry.pool("spark").map_or(0, Pool::len),
        );
    }

    // An unregistered tag degrades to a warning plus None, never a crash.
    assert!(registry.spawn(&mut host, "ghost", Placement::default()).is_none());

    info!("scene holds {} instances across {} pools", host.len(), registry.len());
    Ok(())
}
