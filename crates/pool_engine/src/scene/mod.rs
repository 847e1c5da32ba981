//! Scene host boundary
//!
//! The pooling core never touches engine objects directly. Everything it
//! needs from the engine - instantiation, activation flags, transforms,
//! parenting - goes through the [`InstanceHost`] trait, so the same pools
//! work against any scene backend. [`SceneHost`] is a slot-map-backed
//! reference implementation used by the demo app and the tests.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Quat, Vec3};

new_key_type! {
    /// Opaque handle to a pooled engine instance
    pub struct InstanceHandle;
}

/// Identifier for a template object the host knows how to instantiate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrototypeId(String);

impl PrototypeId {
    /// Create a prototype id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PrototypeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PrototypeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PrototypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Placement applied to a spawned instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// World position
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
    /// Optional parent to attach the instance to
    pub parent: Option<InstanceHandle>,
}

impl Placement {
    /// Create a placement from position and rotation
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            parent: None,
        }
    }

    /// Create a placement with identity rotation
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::identity())
    }

    /// Attach the instance to a parent on spawn
    #[must_use]
    pub const fn with_parent(mut self, parent: InstanceHandle) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::from_position(Vec3::zeros())
    }
}

/// Engine services the pooling core calls into
///
/// All operations are synchronous and tolerant of stale handles: queries
/// on a handle the host no longer knows return `false`, and setters on
/// such a handle are no-ops.
pub trait InstanceHost {
    /// Create a fresh instance from a prototype
    fn instantiate(&mut self, prototype: &PrototypeId) -> InstanceHandle;

    /// Whether the host still knows this handle
    fn contains(&self, handle: InstanceHandle) -> bool;

    /// Set the activation flag of an instance
    fn set_active(&mut self, handle: InstanceHandle, active: bool);

    /// Read the activation flag of an instance
    fn is_active(&self, handle: InstanceHandle) -> bool;

    /// Attach an instance to a parent
    fn set_parent(&mut self, handle: InstanceHandle, parent: InstanceHandle);

    /// Set the world position of an instance
    fn set_position(&mut self, handle: InstanceHandle, position: Vec3);

    /// Set the world rotation of an instance
    fn set_rotation(&mut self, handle: InstanceHandle, rotation: Quat);
}

/// One engine object in the reference host
#[derive(Debug, Clone)]
pub struct SceneInstance {
    /// Prototype this instance was created from
    pub prototype: PrototypeId,
    /// Activation flag
    pub active: bool,
    /// World position
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
    /// Parent, if attached
    pub parent: Option<InstanceHandle>,
}

impl SceneInstance {
    fn from_prototype(prototype: &PrototypeId) -> Self {
        Self {
            prototype: prototype.clone(),
            // Fresh instances come up active, like engine-side clones do;
            // pools deactivate them right after instantiation.
            active: true,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            parent: None,
        }
    }
}

/// Reference host backed by a slot map
#[derive(Debug, Default)]
pub struct SceneHost {
    instances: SlotMap<InstanceHandle, SceneInstance>,
}

impl SceneHost {
    /// Create an empty host
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instances the host holds
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the host holds no instances
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Look up an instance by handle
    #[must_use]
    pub fn get(&self, handle: InstanceHandle) -> Option<&SceneInstance> {
        self.instances.get(handle)
    }
}

impl InstanceHost for SceneHost {
    fn instantiate(&mut self, prototype: &PrototypeId) -> InstanceHandle {
        self.instances.insert(SceneInstance::from_prototype(prototype))
    }

    fn contains(&self, handle: InstanceHandle) -> bool {
        self.instances.contains_key(handle)
    }

    fn set_active(&mut self, handle: InstanceHandle, active: bool) {
        if let Some(instance) = self.instances.get_mut(handle) {
            instance.active = active;
        }
    }

    fn is_active(&self, handle: InstanceHandle) -> bool {
        self.instances.get(handle).is_some_and(|i| i.active)
    }

    fn set_parent(&mut self, handle: InstanceHandle, parent: InstanceHandle) {
        if let Some(instance) = self.instances.get_mut(handle) {
            instance.parent = Some(parent);
        }
    }

    fn set_position(&mut self, handle: InstanceHandle, position: Vec3) {
        if let Some(instance) = self.instances.get_mut(handle) {
            instance.position = position;
        }
    }

    fn set_rotation(&mut self, handle: InstanceHandle, rotation: Quat) {
        if let Some(instance) = self.instances.get_mut(handle) {
            instance.rotation = rotation;
        }
    }
}
