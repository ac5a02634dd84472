// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-pass tests: topology plus every connection generator.

use approx::assert_relative_eq;
use portal_core::{
    ConnectionKind, Feature, Generation, ProjectConfig, RoofType, Side, Topology,
};
use rustc_hash::FxHashSet;

fn project(roof: RoofType, frames: usize) -> ProjectConfig {
    let mut config = ProjectConfig::default();
    config.building.roof = roof;
    config.building.frames = frames;
    config
}

fn count(generation: &Generation, connection: ConnectionKind, kind: &str) -> usize {
    generation
        .features()
        .iter()
        .filter(|f| f.meta().connection == connection && f.kind() == kind)
        .count()
}

#[test]
fn test_single_frame_building() {
    let config = project(RoofType::DualSlope, 1);
    let topology = Topology::build(&config.building, &config.members).unwrap();
    assert_eq!(topology.frames.len(), 1);
    assert_relative_eq!(topology.frames[0].z, 0.0);
    assert!(topology
        .members
        .iter()
        .all(|m| m.start.z.is_finite() && m.end.z.is_finite()));

    let generation = Generation::run(&config).unwrap();
    assert_eq!(count(&generation, ConnectionKind::Ridge, "PLATE"), 1);
    assert_eq!(count(&generation, ConnectionKind::Cope, "CUT"), 2);
}

#[test]
fn test_dual_slope_copes_target_rafters() {
    let generation = Generation::run(&project(RoofType::DualSlope, 3)).unwrap();
    let cuts: Vec<_> = generation
        .features()
        .iter()
        .filter_map(Feature::as_cut)
        .collect();
    assert_eq!(cuts.len(), 6);

    let member_names: FxHashSet<&str> = generation.members().iter().map(|m| m.name.as_str()).collect();
    for frame in 0..3 {
        let in_frame: Vec<_> = cuts.iter().filter(|c| c.meta.frame == frame).collect();
        assert_eq!(in_frame.len(), 2);
        for cut in in_frame {
            assert!(member_names.contains(cut.target.as_str()), "{}", cut.target);
            assert!(cut.target.starts_with("RAF-"));
        }
    }

    let targets: FxHashSet<&str> = cuts.iter().map(|c| c.target.as_str()).collect();
    assert_eq!(targets.len(), 6);
}

#[test]
fn test_end_plates_per_roof_type() {
    for (roof, kind, per_frame) in [
        (RoofType::Flat, ConnectionKind::EndPlate, 2),
        (RoofType::SingleSlope, ConnectionKind::EndPlate, 1),
        (RoofType::DualSlope, ConnectionKind::Ridge, 1),
    ] {
        let generation = Generation::run(&project(roof, 4)).unwrap();
        assert_eq!(count(&generation, kind, "PLATE"), per_frame * 4, "{}", roof);
        assert_eq!(count(&generation, kind, "BOLT_GROUP"), per_frame * 4, "{}", roof);
    }

    let single = Generation::run(&project(RoofType::SingleSlope, 2)).unwrap();
    assert!(single
        .features()
        .iter()
        .filter(|f| f.meta().connection == ConnectionKind::EndPlate)
        .all(|f| f.meta().side == Some(Side::Right)));
}

#[test]
fn test_feature_names_unique_with_everything_enabled() {
    for roof in [RoofType::Flat, RoofType::SingleSlope, RoofType::DualSlope] {
        let mut config = project(roof, 5);
        config.connections.stiffener.enabled = true;
        let generation = Generation::run(&config).unwrap();

        let mut names = FxHashSet::default();
        for feature in generation.features() {
            assert!(names.insert(feature.name()), "duplicate {}", feature.name());
        }
        for member in generation.members() {
            assert!(names.insert(member.name.as_str()), "duplicate {}", member.name);
        }
    }
}

#[test]
fn test_generation_is_deterministic() {
    let mut config = project(RoofType::DualSlope, 4);
    config.connections.stiffener.enabled = true;
    let first = Generation::run(&config).unwrap();
    let second = Generation::run(&config).unwrap();

    assert_eq!(first.members(), second.members());
    assert_eq!(first.features(), second.features());
}

#[test]
fn test_generator_order() {
    let generation = Generation::run(&project(RoofType::DualSlope, 2)).unwrap();
    let order: Vec<ConnectionKind> = generation
        .features()
        .iter()
        .map(|f| f.meta().connection)
        .fold(Vec::new(), |mut seen, kind| {
            if seen.last() != Some(&kind) {
                seen.push(kind);
            }
            seen
        });
    assert_eq!(
        order,
        [
            ConnectionKind::Baseplate,
            ConnectionKind::Knee,
            ConnectionKind::Ridge,
            ConnectionKind::Cope
        ]
    );
}

#[test]
fn test_every_feature_frame_is_orthonormal() {
    for roof in [RoofType::Flat, RoofType::SingleSlope, RoofType::DualSlope] {
        let mut config = project(roof, 3);
        config.connections.stiffener.enabled = true;
        let generation = Generation::run(&config).unwrap();
        for feature in generation.features() {
            assert!(feature.frame().is_orthonormal(1e-6), "{}", feature.name());
        }
    }
}

#[test]
fn test_negative_single_slope_generates() {
    let mut config = project(RoofType::SingleSlope, 3);
    config.building.slope = -0.05;
    config.connections.stiffener.enabled = true;
    let generation = Generation::run(&config).unwrap();

    let rafter = generation
        .members()
        .iter()
        .find(|m| m.name == "RAF-1")
        .unwrap();
    assert_relative_eq!(rafter.start.y, 6.0, epsilon = 1e-12);
    assert_relative_eq!(rafter.end.y, 5.0, epsilon = 1e-12);

    let end_plates: Vec<_> = generation
        .features()
        .iter()
        .filter(|f| f.meta().connection == ConnectionKind::EndPlate && f.kind() == "PLATE")
        .collect();
    assert_eq!(end_plates.len(), 3);
    assert!(end_plates.iter().all(|f| f.meta().side == Some(Side::Left)));
    for feature in generation.features() {
        assert!(feature.frame().is_orthonormal(1e-6), "{}", feature.name());
    }
}
