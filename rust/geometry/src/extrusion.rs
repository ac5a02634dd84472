// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Preview extrusion - sweeping a section outline into a triangle mesh

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::profile::Polygon2D;
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Extrude a closed outline along local +Z.
///
/// With a transform the mesh is placed in the parent frame, e.g. the
/// matrix of a member's [`crate::Frame`] at its start point.
pub fn extrude_polygon(
    polygon: &Polygon2D,
    depth: f64,
    transform: Option<Matrix4<f64>>,
) -> Result<Mesh> {
    if depth <= 0.0 {
        return Err(Error::InvalidExtrusion(
            "Depth must be positive".to_string(),
        ));
    }

    let ring = polygon.ring();
    let indices = polygon.triangulate()?;

    let mut mesh = Mesh::with_capacity(ring.len() * 6, indices.len() * 2 + ring.len() * 6);

    create_cap(ring, &indices, 0.0, &mut mesh);
    create_cap(ring, &indices, depth, &mut mesh);
    create_side_walls(ring, polygon.signed_area() < 0.0, depth, &mut mesh);

    if let Some(mat) = transform {
        apply_transform(&mut mesh, &mat);
    }

    Ok(mesh)
}

fn create_cap(ring: &[Point2<f64>], indices: &[usize], z: f64, mesh: &mut Mesh) {
    let base_index = mesh.vertex_count() as u32;
    let bottom = z == 0.0;
    let normal = if bottom {
        Vector3::new(0.0, 0.0, -1.0)
    } else {
        Vector3::z()
    };

    for point in ring {
        mesh.add_vertex(Point3::new(point.x, point.y, z), normal);
    }

    for tri in indices.chunks_exact(3) {
        let i0 = base_index + tri[0] as u32;
        let i1 = base_index + tri[1] as u32;
        let i2 = base_index + tri[2] as u32;

        // Reverse winding for bottom cap
        if bottom {
            mesh.add_triangle(i0, i2, i1);
        } else {
            mesh.add_triangle(i0, i1, i2);
        }
    }
}

fn create_side_walls(ring: &[Point2<f64>], clockwise: bool, depth: f64, mesh: &mut Mesh) {
    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        let (p0, p1) = if clockwise {
            (&ring[j], &ring[i])
        } else {
            (&ring[i], &ring[j])
        };

        // Outward normal of a counter-clockwise edge; skip duplicate points
        let edge = Vector3::new(p1.x - p0.x, p1.y - p0.y, 0.0);
        let normal = match Vector3::new(edge.y, -edge.x, 0.0).try_normalize(1e-10) {
            Some(n) => n,
            None => continue,
        };

        let idx = mesh.vertex_count() as u32;
        mesh.add_vertex(Point3::new(p0.x, p0.y, 0.0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, 0.0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, depth), normal);
        mesh.add_vertex(Point3::new(p0.x, p0.y, depth), normal);

        mesh.add_triangle(idx, idx + 1, idx + 2);
        mesh.add_triangle(idx, idx + 2, idx + 3);
    }
}

/// Apply transformation matrix to mesh
pub fn apply_transform(mesh: &mut Mesh, transform: &Matrix4<f64>) {
    mesh.positions.chunks_exact_mut(3).for_each(|chunk| {
        let point = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
        let transformed = transform.transform_point(&point);
        chunk[0] = transformed.x as f32;
        chunk[1] = transformed.y as f32;
        chunk[2] = transformed.z as f32;
    });

    // Inverse transpose for normals
    let normal_matrix = transform.try_inverse().unwrap_or(*transform).transpose();

    mesh.normals.chunks_exact_mut(3).for_each(|chunk| {
        let normal = Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
        let transformed = (normal_matrix * normal.to_homogeneous()).xyz().normalize();
        chunk[0] = transformed.x as f32;
        chunk[1] = transformed.y as f32;
        chunk[2] = transformed.z as f32;
    });
}
