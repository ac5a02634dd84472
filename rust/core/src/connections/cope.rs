// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rafter copes at the eaves of dual-slope frames

use super::FeatureGenerator;
use crate::building::RoofType;
use crate::config::{ConnectionConfig, CopeConfig};
use crate::feature::{ConnectionKind, Cut, Feature, FeatureMeta};
use crate::topology::{rafter_name, Side, Topology};
use nalgebra::Vector3;
use portal_geometry::{make_frame, normalize};

/// A cut box at each eave targeting that side's rafter. Local Z runs from
/// the eave toward the ridge, matching the rafter's own extrusion direction.
pub struct CopeGenerator<'a> {
    cope: &'a CopeConfig,
}

impl<'a> CopeGenerator<'a> {
    pub fn new(config: &'a ConnectionConfig) -> Self {
        Self { cope: &config.cope }
    }
}

impl FeatureGenerator for CopeGenerator<'_> {
    fn name(&self) -> &'static str {
        "cope"
    }

    fn generate(&self, topology: &Topology) -> Vec<Feature> {
        if !self.cope.enabled || topology.roof() != RoofType::DualSlope {
            return Vec::new();
        }

        let mut features = Vec::new();
        for joints in &topology.frames {
            let Some(ridge) = joints.ridge else {
                continue;
            };
            for side in Side::BOTH {
                let eave = joints.eave(side);
                let frame = make_frame(&normalize(&(ridge - eave)), &Vector3::y());
                features.push(Feature::Cut(Cut {
                    name: format!("CP-{}-{}", side, joints.index + 1),
                    target: rafter_name(RoofType::DualSlope, side, joints.index),
                    origin: eave + frame.to_global(&Vector3::from(self.cope.offset)),
                    frame,
                    width: self.cope.width,
                    height: self.cope.height,
                    depth: self.cope.depth,
                    center_offset: self.cope.center_offset(),
                    meta: FeatureMeta::new(ConnectionKind::Cope, joints.index, Some(side)),
                }));
            }
        }
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::Building;
    use crate::config::MemberProfiles;
    use approx::assert_relative_eq;

    fn topology(roof: RoofType, frames: usize) -> Topology {
        let building = Building {
            frames,
            roof,
            ..Default::default()
        };
        Topology::build(&building, &MemberProfiles::default()).unwrap()
    }

    #[test]
    fn test_no_cuts_without_ridge() {
        let config = ConnectionConfig::default();
        for roof in [RoofType::Flat, RoofType::SingleSlope] {
            assert!(CopeGenerator::new(&config).generate(&topology(roof, 3)).is_empty());
        }
    }

    #[test]
    fn test_cut_axis_matches_rafter() {
        let config = ConnectionConfig::default();
        let topo = topology(RoofType::DualSlope, 2);
        for feature in CopeGenerator::new(&config).generate(&topo) {
            let cut = feature.as_cut().unwrap();
            let rafter = topo.member(&cut.target).unwrap();
            assert_relative_eq!(cut.frame.z, rafter.direction(), epsilon = 1e-12);
            assert_relative_eq!(cut.origin, rafter.start, epsilon = 1e-12);
            assert!(cut.frame.is_orthonormal(1e-9));
        }
    }

    #[test]
    fn test_notch_is_below_and_inside_the_rafter() {
        let config = ConnectionConfig::default();
        let topo = topology(RoofType::DualSlope, 1);
        let features = CopeGenerator::new(&config).generate(&topo);
        let left = features[0].as_cut().unwrap();
        assert_eq!(left.name, "CP-L-1");
        assert_eq!(left.target, "RAF-L-1");

        let to_centre = left.center() - left.origin;
        // Toward the ridge along the rafter, and below its axis
        assert_relative_eq!(to_centre.dot(&left.frame.z), config.cope.depth / 2.0, epsilon = 1e-12);
        assert!(to_centre.y < 0.0);
        assert!(to_centre.x > 0.0);

        let right = features[1].as_cut().unwrap();
        assert_eq!(right.target, "RAF-R-1");
        assert!((right.center() - right.origin).x < 0.0);
    }
}
