// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Knee joints: column-to-rafter plates at the eaves

use super::{bolt_group, plate, FeatureGenerator};
use crate::config::{BoltConfig, ConnectionConfig, KneeConfig, StiffenerConfig};
use crate::feature::{ConnectionKind, Feature, FeatureMeta};
use crate::topology::{Side, Topology};
use portal_geometry::make_frame;

/// One plate and bolt group at every eave. The plate faces into the frame
/// and its in-plane X axis leans with the local rafter.
pub struct KneeGenerator<'a> {
    plate: &'a KneeConfig,
    bolts: &'a BoltConfig,
    stiffener: &'a StiffenerConfig,
}

impl<'a> KneeGenerator<'a> {
    pub fn new(config: &'a ConnectionConfig) -> Self {
        Self {
            plate: &config.knee,
            bolts: &config.bolts,
            stiffener: &config.stiffener,
        }
    }
}

impl FeatureGenerator for KneeGenerator<'_> {
    fn name(&self) -> &'static str {
        "knee"
    }

    fn generate(&self, topology: &Topology) -> Vec<Feature> {
        if !self.plate.enabled {
            return Vec::new();
        }

        let t = self.plate.thickness;
        let mut features = Vec::new();

        for joints in &topology.frames {
            let i = joints.index + 1;
            for side in Side::BOTH {
                let frame = make_frame(&side.inward(), &joints.rafter_direction(side));
                let origin = joints.eave(side) + frame.to_global(&self.plate.offset());
                let meta = FeatureMeta::new(ConnectionKind::Knee, joints.index, Some(side));

                features.push(plate(
                    format!("KP-{}-{}", side, i),
                    origin,
                    frame,
                    (self.plate.width, self.plate.height, t),
                    meta,
                ));
                features.push(bolt_group(
                    format!("KPB-{}-{}", side, i),
                    origin + frame.z * (t / 2.0),
                    frame,
                    self.bolts,
                    meta,
                ));

                if self.stiffener.enabled {
                    let s = self.stiffener;
                    features.push(plate(
                        format!("KP-STF-{}-{}", side, i),
                        origin + frame.z * (t + s.clearance),
                        frame,
                        (s.width, s.height, s.thickness),
                        FeatureMeta::new(ConnectionKind::KneeStiffener, joints.index, Some(side)),
                    ));
                }
            }
        }
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{Building, RoofType};
    use crate::config::MemberProfiles;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn topology(roof: RoofType) -> Topology {
        let building = Building {
            frames: 2,
            roof,
            ..Default::default()
        };
        Topology::build(&building, &MemberProfiles::default()).unwrap()
    }

    #[test]
    fn test_plate_per_eave() {
        let config = ConnectionConfig::default();
        let features = KneeGenerator::new(&config).generate(&topology(RoofType::DualSlope));
        assert_eq!(features.len(), 2 * 2 * 2);
        let names: Vec<_> = features.iter().map(|f| f.name()).collect();
        assert_eq!(&names[..4], &["KP-L-1", "KPB-L-1", "KP-R-1", "KPB-R-1"]);
    }

    #[test]
    fn test_plate_faces_inward() {
        let config = ConnectionConfig::default();
        for roof in [RoofType::Flat, RoofType::SingleSlope, RoofType::DualSlope] {
            let features = KneeGenerator::new(&config).generate(&topology(roof));
            let left = features[0].as_plate().unwrap();
            let right = features[2].as_plate().unwrap();
            assert_relative_eq!(left.frame.z, Vector3::x(), epsilon = 1e-12);
            assert_relative_eq!(right.frame.z, -Vector3::x(), epsilon = 1e-12);
            assert!(left.frame.is_orthonormal(1e-9), "{:?}", roof);
            assert!(right.frame.is_orthonormal(1e-9), "{:?}", roof);
        }
    }

    #[test]
    fn test_sloped_rafter_gives_upward_plate_axis() {
        let config = ConnectionConfig::default();
        let features = KneeGenerator::new(&config).generate(&topology(RoofType::DualSlope));
        let left = features[0].as_plate().unwrap();
        // Rafter rises away from the eave, so its projection onto the plate is up
        assert_relative_eq!(left.frame.x, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(left.origin, topology(RoofType::DualSlope).frames[0].eave_left);
    }

    #[test]
    fn test_flat_rafter_falls_back_to_valid_frame() {
        let config = ConnectionConfig::default();
        let features = KneeGenerator::new(&config).generate(&topology(RoofType::Flat));
        let left = features[0].as_plate().unwrap();
        // Rafter parallel to the plate normal: X comes from the kernel fallback
        assert_relative_eq!(left.frame.x, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
        assert!(left.frame.x.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_stiffener_clears_the_plate() {
        let mut config = ConnectionConfig::default();
        config.stiffener.enabled = true;
        let features = KneeGenerator::new(&config).generate(&topology(RoofType::DualSlope));
        assert_eq!(features.len(), 2 * 2 * 3);
        let plate = features[0].as_plate().unwrap();
        let stiffener = features[2].as_plate().unwrap();
        assert_eq!(stiffener.name, "KP-STF-L-1");
        let gap = (stiffener.origin - plate.origin).dot(&plate.frame.z);
        assert_relative_eq!(gap, plate.thickness + config.stiffener.clearance, epsilon = 1e-12);
    }
}
