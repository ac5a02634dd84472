// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the geometry layer
///
/// Profile resolution and frame construction are total and never produce
/// these; only catalog loading and preview meshing can fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Invalid extrusion parameters: {0}")]
    InvalidExtrusion(String),

    #[error("Catalog '{name}' could not be loaded: {source}")]
    CatalogLoad {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}
