// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Column baseplates with anchor bolts

use super::{bolt_group, plate, FeatureGenerator};
use crate::config::{BaseplateConfig, BoltConfig, ConnectionConfig, StiffenerConfig};
use crate::feature::{ConnectionKind, Feature, FeatureMeta};
use crate::topology::{Side, Topology};
use nalgebra::Vector3;
use portal_geometry::make_frame;

/// One horizontal plate and bolt group under every column, plus optional
/// stiffeners standing on the plate.
pub struct BaseplateGenerator<'a> {
    plate: &'a BaseplateConfig,
    bolts: &'a BoltConfig,
    stiffener: &'a StiffenerConfig,
}

impl<'a> BaseplateGenerator<'a> {
    pub fn new(config: &'a ConnectionConfig) -> Self {
        Self {
            plate: &config.baseplate,
            bolts: &config.bolts,
            stiffener: &config.stiffener,
        }
    }
}

impl FeatureGenerator for BaseplateGenerator<'_> {
    fn name(&self) -> &'static str {
        "baseplate"
    }

    fn generate(&self, topology: &Topology) -> Vec<Feature> {
        if !self.plate.enabled {
            return Vec::new();
        }

        let up = Vector3::y();
        let frame = make_frame(&up, &Vector3::x());
        let t = self.plate.thickness;
        let mut features = Vec::new();

        for joints in &topology.frames {
            let i = joints.index + 1;
            for side in Side::BOTH {
                let meta = FeatureMeta::new(ConnectionKind::Baseplate, joints.index, Some(side));
                // Top face meets the column base
                let origin =
                    joints.base(side) - up * t + frame.to_global(&self.plate.offset());

                features.push(plate(
                    format!("BP-{}-{}", side, i),
                    origin,
                    frame,
                    (self.plate.width, self.plate.height, t),
                    meta,
                ));
                features.push(bolt_group(
                    format!("BPB-{}-{}", side, i),
                    origin + up * (t / 2.0),
                    frame,
                    self.bolts,
                    meta,
                ));

                if self.stiffener.enabled {
                    let s = self.stiffener;
                    let inward = side.inward();
                    let stiffener_frame = make_frame(&inward, &up);
                    // Stands on the plate, centred on the column axis and
                    // shifted with the plate offset
                    let stiffener_origin = joints.base(side) + up * (s.width / 2.0)
                        - inward * (s.thickness / 2.0)
                        + frame.to_global(&self.plate.offset());
                    features.push(plate(
                        format!("BP-STF-{}-{}", side, i),
                        stiffener_origin,
                        stiffener_frame,
                        (s.width, s.height, s.thickness),
                        FeatureMeta::new(ConnectionKind::BaseStiffener, joints.index, Some(side)),
                    ));
                }
            }
        }
        features
    }
}
