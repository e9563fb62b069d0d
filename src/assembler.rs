//! Turns a part catalog into a [`CompositeObject`].
//!
//! The catalog is checked as a whole before a single node is built, so a
//! caller either gets the complete composite or a [`MalformedDescriptor`].

use std::collections::HashSet;

use crate::{
    catalog::{PartDescriptor, PartRole},
    data_structures::{
        instance::Instance,
        scene_graph::{CompositeObject, MaterialBinding, PartNode},
    },
    error::{DescriptorProblem, MalformedDescriptor},
    media::TextureHandle,
};

pub fn validate(catalog: &[PartDescriptor]) -> Result<(), MalformedDescriptor> {
    if catalog.is_empty() {
        return Err(MalformedDescriptor::new("", DescriptorProblem::EmptyCatalog));
    }

    let mut names = HashSet::new();
    let mut display_surface: Option<&str> = None;
    for part in catalog {
        if !names.insert(part.name) {
            return Err(MalformedDescriptor::new(
                part.name,
                DescriptorProblem::DuplicateName,
            ));
        }
        if let Some((index, value)) = part
            .shape
            .dimensions()
            .into_iter()
            .enumerate()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            return Err(MalformedDescriptor::new(
                part.name,
                DescriptorProblem::NonPositiveDimension { index, value },
            ));
        }
        if !part.offset.is_finite() {
            return Err(MalformedDescriptor::new(
                part.name,
                DescriptorProblem::NonFiniteOffset,
            ));
        }
        if part.role == PartRole::DisplaySurface {
            if let Some(first) = display_surface {
                return Err(MalformedDescriptor::new(
                    part.name,
                    DescriptorProblem::SecondDisplaySurface {
                        first: first.to_string(),
                    },
                ));
            }
            display_surface = Some(part.name);
        }
    }

    match display_surface {
        Some(_) => Ok(()),
        None => Err(MalformedDescriptor::new(
            "",
            DescriptorProblem::NoDisplaySurface,
        )),
    }
}

/// Build one child per descriptor, in catalog order.
///
/// Solid parts get their flat colour, the display surface gets `texture`.
/// The returned composite is not attached to anything yet.
pub fn assemble(
    catalog: &[PartDescriptor],
    texture: &TextureHandle,
) -> Result<CompositeObject, MalformedDescriptor> {
    validate(catalog)?;

    let children = catalog
        .iter()
        .map(|part| {
            let material = match part.role {
                PartRole::Solid => MaterialBinding::Flat(part.color),
                PartRole::DisplaySurface => MaterialBinding::Texture(texture.clone()),
            };
            PartNode::new(part.name, part.shape, material, Instance::from(&part.offset))
        })
        .collect::<Vec<_>>();

    log::debug!(
        "assembled composite with {} parts, screen bound to texture #{}",
        children.len(),
        texture.id()
    );
    Ok(CompositeObject::new(children))
}
