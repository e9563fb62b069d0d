use cgmath::{ElementWise, Vector3};
use wgpu::util::DeviceExt;

use crate::{catalog::Shape, data_structures::model};

/// CPU side vertex and index data of one primitive, centred on its origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<model::ModelVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn for_shape(shape: &Shape) -> Geometry {
        match *shape {
            Shape::Box {
                width,
                height,
                depth,
            } => box_geometry(width, height, depth),
            Shape::Plane { width, height } => plane_geometry(width, height),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/**
 * Pushes one quad spanned by `u` and `v` around `center`.
 *
 * `u x v` must point along `normal` so that the two triangles come out
 * counter-clockwise when seen from the front, which is what back-face culling
 * expects. Texture coordinates put (0, 0) at the corner `center - u + v`.
 */
fn push_quad(
    geometry: &mut Geometry,
    center: Vector3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
    normal: Vector3<f32>,
) {
    let base = geometry.vertices.len() as u32;
    let corners = [
        (center - u - v, [0.0, 1.0]),
        (center + u - v, [1.0, 1.0]),
        (center + u + v, [1.0, 0.0]),
        (center - u + v, [0.0, 0.0]),
    ];
    for (position, tex_coords) in corners {
        geometry.vertices.push(model::ModelVertex {
            position: position.into(),
            tex_coords,
            normal: normal.into(),
        });
    }
    geometry
        .indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// An axis aligned box with flat shaded faces: 24 vertices, 36 indices.
pub fn box_geometry(width: f32, height: f32, depth: f32) -> Geometry {
    let half = Vector3::new(width, height, depth) / 2.0;
    // (normal, u, v) with u x v == normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    let mut geometry = Geometry {
        vertices: Vec::with_capacity(24),
        indices: Vec::with_capacity(36),
    };
    for (normal, u, v) in faces {
        let normal = Vector3::from(normal);
        push_quad(
            &mut geometry,
            normal.mul_element_wise(half),
            Vector3::from(u).mul_element_wise(half),
            Vector3::from(v).mul_element_wise(half),
            normal,
        );
    }
    geometry
}

/// A single quad in the XY plane facing +Z: 4 vertices, 6 indices.
pub fn plane_geometry(width: f32, height: f32) -> Geometry {
    let mut geometry = Geometry {
        vertices: Vec::with_capacity(4),
        indices: Vec::with_capacity(6),
    };
    push_quad(
        &mut geometry,
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(width / 2.0, 0.0, 0.0),
        Vector3::new(0.0, height / 2.0, 0.0),
        Vector3::unit_z(),
    );
    geometry
}

pub fn upload_mesh(device: &wgpu::Device, name: &str, geometry: &Geometry) -> model::Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&geometry.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(&geometry.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    model::Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: geometry.indices.len() as u32,
    }
}
