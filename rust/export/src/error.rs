// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] portal_core::Error),

    #[error("Feature '{name}' has non-positive {field} ({value})")]
    InvalidFeature {
        name: String,
        field: &'static str,
        value: f64,
    },

    #[error("Member '{0}' has zero length")]
    DegenerateMember(String),
}
