//! The composite object: one root owning its parts by value.
//!
//! The tree is flat on purpose. Every part's local transform is relative to
//! the root, the set of parts is fixed after assembly and only the root
//! transform changes afterwards.

use crate::{
    catalog::{PartRole, Rgb, Shape},
    data_structures::instance::Instance,
    media::TextureHandle,
};

/// What a part's surface is painted with.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialBinding {
    /// Lit, flat colour.
    Flat(Rgb),
    /// Unlit, sampled from the screen texture with this handle's id.
    Texture(TextureHandle),
}

impl MaterialBinding {
    pub fn role(&self) -> PartRole {
        match self {
            MaterialBinding::Flat(_) => PartRole::Solid,
            MaterialBinding::Texture(_) => PartRole::DisplaySurface,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartNode {
    pub name: &'static str,
    pub shape: Shape,
    pub material: MaterialBinding,
    local: Instance,
    world: Instance,
}

impl PartNode {
    pub fn new(name: &'static str, shape: Shape, material: MaterialBinding, local: Instance) -> Self {
        Self {
            name,
            shape,
            material,
            world: local.clone(),
            local,
        }
    }

    pub fn local_transform(&self) -> &Instance {
        &self.local
    }

    pub fn world_transform(&self) -> &Instance {
        &self.world
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompositeObject {
    root: Instance,
    children: Vec<PartNode>,
}

impl CompositeObject {
    pub(crate) fn new(children: Vec<PartNode>) -> Self {
        let mut composite = Self {
            root: Instance::default(),
            children,
        };
        composite.update_world_transforms();
        composite
    }

    pub fn children(&self) -> &[PartNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&PartNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The part bound to the screen texture.
    pub fn display_surface(&self) -> Option<&PartNode> {
        self.children
            .iter()
            .find(|child| matches!(child.material, MaterialBinding::Texture(_)))
    }

    pub fn root_transform(&self) -> &Instance {
        &self.root
    }

    /// Turn the whole composite about its vertical axis.
    pub fn set_yaw(&mut self, angle: f32) {
        self.root.rotation = Instance::yawed(angle).rotation;
        self.update_world_transforms();
    }

    /// world = root * local for every part.
    pub fn update_world_transforms(&mut self) {
        let root = &self.root;
        self.children
            .iter_mut()
            .for_each(|child| child.world = root * &child.local);
    }
}
