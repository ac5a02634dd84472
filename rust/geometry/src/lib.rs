// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Portal-Frame Geometry
//!
//! Leaf geometry for parametric portal-frame buildings:
//!
//! - **Frame kernel**: zero-safe normalization and right-handed orthonormal
//!   local frames built from a primary axis and a preferred secondary direction
//! - **Profile resolver**: steel section catalogs searched by priority with a
//!   role-based fallback chain that never fails
//! - **Section outlines**: closed counter-clockwise polygons for I, C, Z and
//!   rectangular sections
//! - **Preview extrusion**: triangle meshes of swept sections for viewers
//!
//! All lengths are metres unless a field says otherwise.

pub mod catalog;
pub mod error;
pub mod extrusion;
pub mod frame;
pub mod mesh;
pub mod profile;
pub mod sections;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector3};

pub use catalog::{Catalog, MemberRole, Profile, ProfileResolver, SectionDims, SectionFamily};
pub use error::{Error, Result};
pub use extrusion::extrude_polygon;
pub use frame::{make_frame, normalize, Frame};
pub use mesh::Mesh;
pub use profile::Polygon2D;
pub use sections::polygon_for;
