//! Named resource descriptors
//!
//! Scenes and the engine each own a [`ResourceStore`]. Lookups are by name
//! and type; a miss returns `None` and is never an error.

use std::collections::HashMap;

use crate::foundation::math::Rect;
use crate::physics::{MaterialDesc, ShapeDesc};

/// Resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// Image file
    Bitmap,
    /// Frame rectangles inside a bitmap
    ImageAtlas,
    /// Collision or clip shape
    Shape,
    /// Physics material
    Material,
    /// Audio file
    Sound,
}

/// Image file reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// File location
    pub location: String,
    /// Load before the scene starts
    pub preload: bool,
}

/// Frame rectangles inside a bitmap
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAtlas {
    /// Bitmap resource name
    pub bitmap: String,
    /// Frames in pixels
    pub frames: Vec<Rect>,
}

impl ImageAtlas {
    /// Frame rectangle by index
    pub fn frame(&self, index: usize) -> Option<Rect> {
        self.frames.get(index).copied()
    }
}

/// Audio file reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    /// File location
    pub location: String,
    /// Start playing when loaded
    pub auto_play: bool,
    /// Loop playback
    pub looped: bool,
}

/// Resource payload
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceData {
    /// Bitmap
    Bitmap(Bitmap),
    /// Image atlas
    ImageAtlas(ImageAtlas),
    /// Shape in pixels
    Shape(ShapeDesc),
    /// Physics material
    Material(MaterialDesc),
    /// Sound
    Sound(Sound),
}

/// A named resource
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Lookup name, unique per type within a store
    pub name: String,
    /// Payload
    pub data: ResourceData,
}

impl Resource {
    /// Create a named resource
    pub fn new(name: impl Into<String>, data: ResourceData) -> Self {
        Self { name: name.into(), data }
    }

    /// Kind of the payload
    pub fn resource_type(&self) -> ResourceType {
        match self.data {
            ResourceData::Bitmap(_) => ResourceType::Bitmap,
            ResourceData::ImageAtlas(_) => ResourceType::ImageAtlas,
            ResourceData::Shape(_) => ResourceType::Shape,
            ResourceData::Material(_) => ResourceType::Material,
            ResourceData::Sound(_) => ResourceType::Sound,
        }
    }
}

/// Resources keyed by type and name
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    resources: HashMap<(ResourceType, String), Resource>,
}

impl ResourceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any resource of the same type and name
    pub fn add_resource(&mut self, resource: Resource) {
        let key = (resource.resource_type(), resource.name.clone());
        if let Some(old) = self.resources.insert(key, resource) {
            log::warn!("Replaced {:?} resource '{}'", old.resource_type(), old.name);
        }
    }

    /// Find a resource by name and type
    pub fn find_resource(&self, name: &str, resource_type: ResourceType) -> Option<&Resource> {
        self.resources.get(&(resource_type, name.to_string()))
    }

    /// Remove a resource by name and type
    pub fn remove_resource(&mut self, name: &str, resource_type: ResourceType) -> Option<Resource> {
        self.resources.remove(&(resource_type, name.to_string()))
    }

    /// Find a shape by name
    pub fn find_shape(&self, name: &str) -> Option<&ShapeDesc> {
        match &self.find_resource(name, ResourceType::Shape)?.data {
            ResourceData::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    /// Find a material by name
    pub fn find_material(&self, name: &str) -> Option<&MaterialDesc> {
        match &self.find_resource(name, ResourceType::Material)?.data {
            ResourceData::Material(material) => Some(material),
            _ => None,
        }
    }

    /// Find an image atlas by name
    pub fn find_atlas(&self, name: &str) -> Option<&ImageAtlas> {
        match &self.find_resource(name, ResourceType::ImageAtlas)?.data {
            ResourceData::ImageAtlas(atlas) => Some(atlas),
            _ => None,
        }
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True if the store is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Remove every resource
    pub fn clear(&mut self) {
        self.resources.clear();
    }

    /// Iterate over all resources
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }
}
