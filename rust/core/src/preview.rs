// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle meshes of members for viewers

use crate::error::Result;
use crate::session::Generation;
use portal_geometry::{extrude_polygon, polygon_for, Mesh, ProfileResolver};

/// Mesh of one member, in model coordinates
#[derive(Debug, Clone)]
pub struct MemberMesh {
    pub name: String,
    pub mesh: Mesh,
}

/// Sweep each member's section along its axis, in member order.
///
/// Cuts are not applied; viewers show the plain members.
pub fn member_meshes(generation: &Generation, resolver: &ProfileResolver) -> Result<Vec<MemberMesh>> {
    generation
        .members()
        .iter()
        .map(|member| {
            let profile = resolver.resolve_with_role(&member.profile_key, Some(member.role));
            let outline = polygon_for(profile);
            let placement = member.frame().to_matrix(&member.start);
            let mesh = extrude_polygon(&outline, member.length(), Some(placement))?;
            Ok(MemberMesh {
                name: member.name.clone(),
                mesh,
            })
        })
        .collect()
}

/// All member meshes merged into one.
pub fn merged_mesh(generation: &Generation, resolver: &ProfileResolver) -> Result<Mesh> {
    let mut merged = Mesh::new();
    for member in member_meshes(generation, resolver)? {
        merged.merge(&member.mesh);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    #[test]
    fn test_mesh_per_member() {
        let mut config = ProjectConfig::default();
        config.building.frames = 2;
        let generation = Generation::run(&config).unwrap();
        let resolver = ProfileResolver::builtin().unwrap();

        let meshes = member_meshes(&generation, &resolver).unwrap();
        assert_eq!(meshes.len(), generation.members().len());
        assert!(meshes.iter().all(|m| m.mesh.triangle_count() > 0));

        let column = &meshes[0];
        assert_eq!(column.name, "COL-L-1");
        let (min, max) = column.mesh.bounds();
        assert!(min.y.abs() < 1e-5);
        assert!((max.y - 6.0).abs() < 1e-5);
        // HEA300 is 290 mm deep, laid across the span
        assert!((max.x - min.x - 0.29).abs() < 1e-4);
    }

    #[test]
    fn test_merged_mesh_counts() {
        let mut config = ProjectConfig::default();
        config.building.frames = 1;
        let generation = Generation::run(&config).unwrap();
        let resolver = ProfileResolver::builtin().unwrap();

        let parts = member_meshes(&generation, &resolver).unwrap();
        let merged = merged_mesh(&generation, &resolver).unwrap();
        let vertices: usize = parts.iter().map(|m| m.mesh.vertex_count()).sum();
        assert_eq!(merged.vertex_count(), vertices);
    }
}
