// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation options
//!
//! Every option has a default; a project file only needs the values it
//! changes. Lengths are metres. Offsets are `[x, y, z]` in the local frame
//! of the feature they move.

use crate::building::Building;
use crate::error::Result;
use nalgebra::{Point2, Vector3};
use portal_geometry::catalog::{MemberRole, ROLE_DEFAULTS};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

fn role_default(role: MemberRole) -> String {
    ROLE_DEFAULTS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, key)| key.to_string())
        .unwrap_or_default()
}

/// Section designations per member role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberProfiles {
    pub column: String,
    pub rafter: String,
    pub purlin: String,
    /// Purlin lines per roof slope; 0 disables purlins
    pub purlins_per_slope: usize,
}

impl Default for MemberProfiles {
    fn default() -> Self {
        Self {
            column: role_default(MemberRole::Column),
            rafter: role_default(MemberRole::Rafter),
            purlin: role_default(MemberRole::Purlin),
            purlins_per_slope: 3,
        }
    }
}

impl MemberProfiles {
    pub fn designation(&self, role: MemberRole) -> &str {
        match role {
            MemberRole::Column => &self.column,
            MemberRole::Rafter => &self.rafter,
            MemberRole::Purlin => &self.purlin,
        }
    }
}

macro_rules! plate_config {
    ($(#[$doc:meta])* $name:ident, $width:expr, $height:expr, $thickness:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub enabled: bool,
            pub width: f64,
            pub height: f64,
            pub thickness: f64,
            pub offset: [f64; 3],
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    enabled: true,
                    width: $width,
                    height: $height,
                    thickness: $thickness,
                    offset: [0.0; 3],
                }
            }
        }

        impl $name {
            pub fn offset(&self) -> Vector3<f64> {
                Vector3::from(self.offset)
            }
        }
    };
}

plate_config!(
    /// Column base plate, horizontal under each column
    BaseplateConfig, 0.35, 0.35, 0.025
);
plate_config!(
    /// Knee plate at each eave, facing into the frame
    KneeConfig, 0.25, 0.5, 0.02
);
plate_config!(
    /// Ridge plate on dual-slope roofs, beam-end plate otherwise
    EndPlateConfig, 0.25, 0.4, 0.02
);

/// Bolt size and hole pattern, shared by every bolt group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoltConfig {
    pub diameter: f64,
    pub length: f64,
    /// Ordered `[x, y]` offsets in the plate plane
    pub pattern: Vec<[f64; 2]>,
}

impl Default for BoltConfig {
    fn default() -> Self {
        Self {
            diameter: 0.02,
            length: 0.08,
            pattern: vec![
                [-0.075, -0.075],
                [0.075, -0.075],
                [0.075, 0.075],
                [-0.075, 0.075],
            ],
        }
    }
}

impl BoltConfig {
    pub fn pattern(&self) -> SmallVec<[Point2<f64>; 8]> {
        self.pattern.iter().map(|[x, y]| Point2::new(*x, *y)).collect()
    }
}

/// Stiffener plates at baseplates and knees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StiffenerConfig {
    pub enabled: bool,
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
    /// Gap between the knee plate and its stiffener
    pub clearance: f64,
}

impl Default for StiffenerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 0.1,
            height: 0.2,
            thickness: 0.01,
            clearance: 0.005,
        }
    }
}

/// Notch cut into rafter ends at the eaves (dual-slope roofs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopeConfig {
    pub enabled: bool,
    /// Extent along the rafter
    pub depth: f64,
    /// Extent along the cut's local X, which leans toward global up
    pub width: f64,
    /// Extent along the cut's local Y, across the rafter
    pub height: f64,
    /// Box centre relative to the eave; `(-0.15, 0, depth / 2)` when unset
    pub center_offset: Option<[f64; 3]>,
    /// Extra shift of the cut origin
    pub offset: [f64; 3],
}

impl Default for CopeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: 0.15,
            width: 0.2,
            height: 0.3,
            center_offset: None,
            offset: [0.0; 3],
        }
    }
}

impl CopeConfig {
    pub fn center_offset(&self) -> Vector3<f64> {
        match self.center_offset {
            Some(c) => Vector3::from(c),
            None => Vector3::new(-0.15, 0.0, self.depth / 2.0),
        }
    }
}

/// Options for all connection feature generators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub baseplate: BaseplateConfig,
    pub knee: KneeConfig,
    pub end_plate: EndPlateConfig,
    pub bolts: BoltConfig,
    pub stiffener: StiffenerConfig,
    pub cope: CopeConfig,
}

/// Everything one generation pass needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub building: Building,
    pub members: MemberProfiles,
    pub connections: ConnectionConfig,
}

impl ProjectConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
