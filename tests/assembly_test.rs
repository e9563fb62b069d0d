use retro_pc::{
    assembler::{assemble, validate},
    catalog::{LocalOffset, PartDescriptor, PartRole, Rgb, Shape, Variant},
    data_structures::{instance::Instance, scene_graph::MaterialBinding},
    error::{DescriptorProblem, MalformedDescriptor},
};

use crate::common::test_utils::{assert_close, screen_handle};
mod common;

fn solid(name: &'static str, shape: Shape) -> PartDescriptor {
    PartDescriptor {
        name,
        shape,
        color: Rgb(0x404040),
        offset: LocalOffset::ORIGIN,
        role: PartRole::Solid,
    }
}

fn screen(name: &'static str) -> PartDescriptor {
    PartDescriptor {
        name,
        shape: Shape::Plane {
            width: 3.4,
            height: 2.4,
        },
        color: Rgb::WHITE,
        offset: LocalOffset::at(0.0, 0.0, 0.91),
        role: PartRole::DisplaySurface,
    }
}

fn unit_box() -> Shape {
    Shape::Box {
        width: 1.0,
        height: 1.0,
        depth: 1.0,
    }
}

#[test]
fn classic_catalog_assembles_into_eight_children_in_order() {
    let handle = screen_handle();
    let composite = assemble(Variant::Classic.parts(), &handle).unwrap();

    assert_eq!(composite.len(), 8);
    for (node, part) in composite.children().iter().zip(Variant::Classic.parts()) {
        assert_eq!(node.name, part.name);
        assert_eq!(node.shape, part.shape);
        assert_eq!(
            node.local_transform().position,
            cgmath::Vector3::from(part.offset.translation)
        );
    }
    assert_eq!(composite.root_transform(), &Instance::default());
}

#[test]
fn only_the_display_screen_is_bound_to_the_texture() {
    let handle = screen_handle();
    let composite = assemble(Variant::Classic.parts(), &handle).unwrap();

    let display = composite.display_surface().unwrap();
    assert_eq!(display.name, "display_screen");
    assert_eq!(display.material, MaterialBinding::Texture(handle.clone()));

    for node in composite.children().iter().filter(|n| n.name != "display_screen") {
        assert_eq!(node.material.role(), PartRole::Solid);
    }
    assert_eq!(
        composite.child("bezel").unwrap().material,
        MaterialBinding::Flat(Rgb(0x2f2f2f))
    );
}

#[test]
fn assembling_twice_gives_the_same_composite() {
    let handle = screen_handle();
    let first = assemble(Variant::Compact.parts(), &handle).unwrap();
    let second = assemble(Variant::Compact.parts(), &handle).unwrap();
    assert_eq!(first, second);
}

#[test]
fn world_transforms_follow_the_root() {
    let handle = screen_handle();
    let mut composite = assemble(Variant::Classic.parts(), &handle).unwrap();

    // Unrotated, world and local agree
    let bezel = composite.child("bezel").unwrap();
    assert_eq!(bezel.world_transform(), bezel.local_transform());

    composite.set_yaw(std::f32::consts::FRAC_PI_2);
    let bezel = composite.child("bezel").unwrap();
    // (0, 0, 0.8) turned a quarter about +Y lands on +X
    assert_close(bezel.world_transform().position.x, 0.8);
    assert_close(bezel.world_transform().position.z, 0.0);
    // The body sits on the origin and only turns
    let body = composite.child("monitor_body").unwrap();
    assert_close(body.world_transform().position.x, 0.0);
}

#[test]
fn keyboard_is_tilted_about_x() {
    let composite = assemble(Variant::Classic.parts(), &screen_handle()).unwrap();
    let keyboard = composite.child("keyboard").unwrap();
    let q = keyboard.local_transform().rotation;
    assert_close(2.0 * q.v.x.atan2(q.s), -0.1);
    assert_close(q.v.y, 0.0);
    assert_close(q.v.z, 0.0);
}

#[test]
fn empty_catalog_is_rejected() {
    let err = assemble(&[], &screen_handle()).unwrap_err();
    assert_eq!(err.problem, DescriptorProblem::EmptyCatalog);
}

#[test]
fn zero_dimension_is_rejected() {
    let catalog = [
        solid(
            "flat_box",
            Shape::Box {
                width: 1.0,
                height: 0.0,
                depth: 1.0,
            },
        ),
        screen("display_screen"),
    ];
    let err = validate(&catalog).unwrap_err();
    assert_eq!(
        err,
        MalformedDescriptor::new(
            "flat_box",
            DescriptorProblem::NonPositiveDimension {
                index: 1,
                value: 0.0
            }
        )
    );
    assert!(err.to_string().contains("flat_box"));
}

#[test]
fn negative_and_nan_dimensions_are_rejected() {
    let negative = [
        screen("display_screen"),
        solid(
            "inside_out",
            Shape::Box {
                width: -1.0,
                height: 1.0,
                depth: 1.0,
            },
        ),
    ];
    assert_eq!(validate(&negative).unwrap_err().part, "inside_out");

    let nan = [solid(
        "ghost",
        Shape::Plane {
            width: f32::NAN,
            height: 1.0,
        },
    )];
    assert!(matches!(
        validate(&nan).unwrap_err().problem,
        DescriptorProblem::NonPositiveDimension { index: 0, .. }
    ));
}

#[test]
fn non_finite_offset_is_rejected() {
    let mut drifting = solid("drifting", unit_box());
    drifting.offset = LocalOffset::at(0.0, f32::INFINITY, 0.0);
    let err = validate(&[screen("display_screen"), drifting]).unwrap_err();
    assert_eq!(err.problem, DescriptorProblem::NonFiniteOffset);
}

#[test]
fn duplicate_names_are_rejected() {
    let catalog = [
        solid("stand", unit_box()),
        screen("display_screen"),
        solid("stand", unit_box()),
    ];
    let err = validate(&catalog).unwrap_err();
    assert_eq!(err, MalformedDescriptor::new("stand", DescriptorProblem::DuplicateName));
}

#[test]
fn display_surface_must_be_unique_and_present() {
    let none = [solid("monitor_body", unit_box())];
    assert_eq!(
        validate(&none).unwrap_err().problem,
        DescriptorProblem::NoDisplaySurface
    );

    let two = [screen("left_screen"), screen("right_screen")];
    assert_eq!(
        validate(&two).unwrap_err(),
        MalformedDescriptor::new(
            "right_screen",
            DescriptorProblem::SecondDisplaySurface {
                first: "left_screen".to_string()
            }
        )
    );
}

#[test]
fn failed_assembly_builds_nothing() {
    let catalog = [solid("monitor_body", unit_box()), solid("monitor_body", unit_box())];
    assert!(assemble(&catalog, &screen_handle()).is_err());
}

#[test]
fn euler_offsets_compose_in_xyz_order() {
    use cgmath::{Rotation, Vector3};
    let half_turn = std::f32::consts::FRAC_PI_2;
    let offset = LocalOffset {
        translation: [0.0; 3],
        rotation: [half_turn, half_turn, 0.0],
    };
    let rotated = Instance::from(&offset)
        .rotation
        .rotate_vector(Vector3::new(1.0, 0.0, 0.0));
    // Ry takes +X to -Z, then Rx takes -Z to +Y.
    assert_close(rotated.x, 0.0);
    assert_close(rotated.y, 1.0);
    assert_close(rotated.z, 0.0);
}
