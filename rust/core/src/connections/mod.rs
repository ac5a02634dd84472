// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection feature generators
//!
//! Each generator reads the topology and its own options and returns its
//! features; it never sees another generator's output. The pass runs them
//! in a fixed order (baseplate, knee, end/ridge plate, cope) and
//! concatenates the results, which keeps naming and entity numbering
//! reproducible.

mod baseplate;
mod cope;
mod end_plate;
mod knee;

pub use baseplate::BaseplateGenerator;
pub use cope::CopeGenerator;
pub use end_plate::EndPlateGenerator;
pub use knee::KneeGenerator;

use crate::config::{BoltConfig, ConnectionConfig};
use crate::feature::{BoltGroup, Feature, FeatureMeta, Plate};
use crate::topology::Topology;
use nalgebra::Point3;
use portal_geometry::Frame;

/// Feature generator trait
/// Each generator handles one kind of connection
pub trait FeatureGenerator {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Features for every frame of the topology
    fn generate(&self, topology: &Topology) -> Vec<Feature>;
}

/// All generators in execution order.
pub fn generators(config: &ConnectionConfig) -> Vec<Box<dyn FeatureGenerator + '_>> {
    vec![
        Box::new(BaseplateGenerator::new(config)),
        Box::new(KneeGenerator::new(config)),
        Box::new(EndPlateGenerator::new(config)),
        Box::new(CopeGenerator::new(config)),
    ]
}

/// Run every generator and concatenate their features in execution order.
pub fn generate_all(topology: &Topology, config: &ConnectionConfig) -> Vec<Feature> {
    generators(config)
        .iter()
        .flat_map(|generator| {
            let features = generator.generate(topology);
            tracing::debug!(generator = generator.name(), count = features.len(), "generated features");
            features
        })
        .collect()
}

fn plate(
    name: String,
    origin: Point3<f64>,
    frame: Frame,
    (width, height, thickness): (f64, f64, f64),
    meta: FeatureMeta,
) -> Feature {
    Feature::Plate(Plate {
        name,
        origin,
        frame,
        width,
        height,
        thickness,
        meta,
    })
}

fn bolt_group(
    name: String,
    origin: Point3<f64>,
    frame: Frame,
    bolts: &BoltConfig,
    meta: FeatureMeta,
) -> Feature {
    Feature::BoltGroup(BoltGroup {
        name,
        origin,
        frame,
        pattern: bolts.pattern(),
        bolt_diameter: bolts.diameter,
        bolt_length: bolts.length,
        meta,
    })
}
