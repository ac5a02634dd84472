// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Portal-Frame Core
//!
//! Parametric layout of single-span steel portal-frame buildings.
//!
//! ## Overview
//!
//! - **Topology**: joint coordinates of every frame and the structural
//!   members (columns, rafters, purlins) for flat, single-slope and
//!   dual-slope roofs
//! - **Connection generators**: baseplates, knee joints, ridge/end plates
//!   and rafter copes as plate, bolt-group and cut features
//! - **Generation session**: one validated pass holding members and
//!   features together, with name uniqueness and cut targets checked
//! - **Takeoff and preview**: member/plate quantities and viewer meshes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use portal_core::{Generation, ProjectConfig, RoofType};
//!
//! let mut config = ProjectConfig::default();
//! config.building.roof = RoofType::DualSlope;
//! config.building.frames = 4;
//!
//! let generation = Generation::run(&config)?;
//! for feature in generation.features() {
//!     println!("{} {}", feature.kind(), feature.name());
//! }
//! ```

pub mod building;
pub mod config;
pub mod connections;
pub mod error;
pub mod feature;
pub mod preview;
pub mod session;
pub mod takeoff;
pub mod topology;

pub use building::{Building, RoofType};
pub use config::{
    BaseplateConfig, BoltConfig, ConnectionConfig, CopeConfig, EndPlateConfig, KneeConfig,
    MemberProfiles, ProjectConfig, StiffenerConfig,
};
pub use connections::{generate_all, FeatureGenerator};
pub use error::{Error, Result};
pub use feature::{BoltGroup, BoltPattern, ConnectionKind, Cut, Feature, FeatureMeta, Plate};
pub use session::Generation;
pub use takeoff::{takeoff, Takeoff};
pub use topology::{FrameJoints, Member, Side, Topology};
