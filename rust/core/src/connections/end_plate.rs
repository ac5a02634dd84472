// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ridge and beam-end plates

use super::{bolt_group, plate, FeatureGenerator};
use crate::building::RoofType;
use crate::config::{BoltConfig, ConnectionConfig, EndPlateConfig};
use crate::feature::{ConnectionKind, Feature, FeatureMeta};
use crate::topology::{FrameJoints, Side, Topology};
use nalgebra::{Point3, Vector3};
use portal_geometry::{make_frame, Frame};

/// Plates in the frame plane, normal along the building length:
///
/// - dual slope: one ridge plate per frame
/// - flat: one plate at each eave
/// - single slope: one plate at the high eave
pub struct EndPlateGenerator<'a> {
    plate: &'a EndPlateConfig,
    bolts: &'a BoltConfig,
}

impl<'a> EndPlateGenerator<'a> {
    pub fn new(config: &'a ConnectionConfig) -> Self {
        Self {
            plate: &config.end_plate,
            bolts: &config.bolts,
        }
    }

    fn emit(
        &self,
        features: &mut Vec<Feature>,
        frame: &Frame,
        at: Point3<f64>,
        (plate_name, bolts_name): (String, String),
        meta: FeatureMeta,
    ) {
        let t = self.plate.thickness;
        // Centred on the frame plane
        let origin = at - frame.z * (t / 2.0) + frame.to_global(&self.plate.offset());
        features.push(plate(
            plate_name,
            origin,
            *frame,
            (self.plate.width, self.plate.height, t),
            meta,
        ));
        features.push(bolt_group(
            bolts_name,
            origin + frame.z * (t / 2.0),
            *frame,
            self.bolts,
            meta,
        ));
    }

    fn eave_plate(&self, features: &mut Vec<Feature>, frame: &Frame, joints: &FrameJoints, side: Side) {
        let i = joints.index + 1;
        self.emit(
            features,
            frame,
            joints.eave(side),
            (format!("EP-{}-{}", side, i), format!("EPB-{}-{}", side, i)),
            FeatureMeta::new(ConnectionKind::EndPlate, joints.index, Some(side)),
        );
    }
}

impl FeatureGenerator for EndPlateGenerator<'_> {
    fn name(&self) -> &'static str {
        "end_plate"
    }

    fn generate(&self, topology: &Topology) -> Vec<Feature> {
        if !self.plate.enabled {
            return Vec::new();
        }

        let frame = make_frame(&Vector3::z(), &Vector3::x());
        let mut features = Vec::new();

        for joints in &topology.frames {
            match (topology.roof(), joints.ridge) {
                (RoofType::DualSlope, Some(ridge)) => {
                    let i = joints.index + 1;
                    self.emit(
                        &mut features,
                        &frame,
                        ridge,
                        (format!("RP-{}", i), format!("RPB-{}", i)),
                        FeatureMeta::new(ConnectionKind::Ridge, joints.index, None),
                    );
                }
                (RoofType::SingleSlope, _) => {
                    self.eave_plate(&mut features, &frame, joints, joints.high_side());
                }
                _ => {
                    for side in Side::BOTH {
                        self.eave_plate(&mut features, &frame, joints, side);
                    }
                }
            }
        }
        features
    }
}
