// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Portal-Frame Export
//!
//! IFC4 STEP output for a validated [`portal_core::Generation`].
//!
//! - **STEP writer**: sequential `#n` numbering with backward references only
//! - **GlobalIds**: 22-character ids derived from element names, stable
//!   across runs
//! - **Encoder**: swept-solid members, boolean-cut rafters, plates and bolt
//!   groups placed in a project/site/building/storey tree
//!
//! ```rust,ignore
//! use portal_core::{Generation, ProjectConfig};
//! use portal_export::{encode, ExportConfig};
//! use portal_geometry::ProfileResolver;
//!
//! let generation = Generation::run(&ProjectConfig::default())?;
//! let resolver = ProfileResolver::builtin()?;
//! let ifc = encode(&generation, &resolver, &ExportConfig::default())?;
//! std::fs::write("portal-frame.ifc", ifc)?;
//! ```

pub mod encoder;
pub mod error;
pub mod guid;
pub mod step;

pub use encoder::{encode, ExportConfig};
pub use error::{Error, Result};
pub use guid::global_id;
pub use step::{EntityId, StepHeader, StepValue, StepWriter};
