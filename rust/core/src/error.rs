// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid building parameters: {0}")]
    InvalidBuilding(String),

    #[error("Unknown roof type '{0}' (expected plana, una_agua or dos_aguas)")]
    UnknownRoofType(String),

    #[error("Duplicate name '{0}' in generation")]
    DuplicateName(String),

    #[error("Cut '{cut}' targets '{target}', which is not a member of this generation")]
    DanglingCutTarget { cut: String, target: String },

    #[error("Geometry error: {0}")]
    Geometry(#[from] portal_geometry::Error),

    #[error("Project file error: {0}")]
    Json(#[from] serde_json::Error),
}
