// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Environment defaults and the project file.

use anyhow::Context;
use portal_core::ProjectConfig;
use portal_export::ExportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Defaults taken from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Output IFC path (`PORTAL_OUTPUT`).
    pub output: PathBuf,
    /// Extra profile catalog appended after the built-in ones (`PORTAL_CATALOG`).
    pub catalog: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any variable source; blank values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            output: var("PORTAL_OUTPUT")
                .unwrap_or_else(|| "portal-frame.ifc".into())
                .into(),
            catalog: var("PORTAL_CATALOG").map(PathBuf::from),
        }
    }

    /// Catalogs to load after the built-in ones: the environment one first,
    /// then those given on the command line.
    pub fn catalogs(&self, extra: &[PathBuf]) -> Vec<PathBuf> {
        self.catalog.iter().chain(extra).cloned().collect()
    }
}

/// Project file: generator options plus export header metadata.
///
/// ```json
/// {
///   "building": { "span": 24, "roof": "una_agua", "slope": 0.08 },
///   "members": { "purlins_per_slope": 4 },
///   "connections": { "stiffener": { "enabled": true } },
///   "export": { "project_name": "Nave 3" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFile {
    #[serde(flatten)]
    pub project: ProjectConfig,
    pub export: ExportConfig,
}

impl ProjectFile {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading project file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing project file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::RoofType;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_env_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.output, PathBuf::from("portal-frame.ifc"));
        assert!(config.catalog.is_none());
        assert!(config.catalogs(&[]).is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORTAL_OUTPUT", "out/nave.ifc"),
            ("PORTAL_CATALOG", "/data/shs.json"),
        ]));
        assert_eq!(config.output, PathBuf::from("out/nave.ifc"));
        assert_eq!(config.catalog, Some(PathBuf::from("/data/shs.json")));

        // Environment catalog loads before the command-line ones
        let catalogs = config.catalogs(&[PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(
            catalogs,
            [
                PathBuf::from("/data/shs.json"),
                PathBuf::from("a.json"),
                PathBuf::from("b.json")
            ]
        );
    }

    #[test]
    fn test_blank_env_values_are_unset() {
        let config = Config::from_lookup(lookup(&[("PORTAL_OUTPUT", ""), ("PORTAL_CATALOG", "  ")]));
        assert_eq!(config.output, PathBuf::from("portal-frame.ifc"));
        assert!(config.catalog.is_none());
        assert_eq!(config.catalogs(&[PathBuf::from("a.json")]), [PathBuf::from("a.json")]);
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        // Only this test touches these variables
        std::env::set_var("PORTAL_OUTPUT", "env-nave.ifc");
        std::env::set_var("PORTAL_CATALOG", "env-catalog.json");
        let config = Config::from_env();
        std::env::remove_var("PORTAL_OUTPUT");
        std::env::remove_var("PORTAL_CATALOG");

        assert_eq!(config.output, PathBuf::from("env-nave.ifc"));
        assert_eq!(config.catalog, Some(PathBuf::from("env-catalog.json")));
        assert_eq!(Config::from_env().output, PathBuf::from("portal-frame.ifc"));
    }

    #[test]
    fn test_project_file_sections() {
        let file = ProjectFile::from_json(
            r#"{
                "building": { "span": 24, "roof": "una_agua" },
                "members": { "purlins_per_slope": 4 },
                "export": { "project_name": "Nave 3" }
            }"#,
        )
        .unwrap();

        assert_eq!(file.project.building.span, 24.0);
        assert_eq!(file.project.building.roof, RoofType::SingleSlope);
        assert_eq!(file.project.building.frames, 6);
        assert_eq!(file.project.members.purlins_per_slope, 4);
        assert!(file.project.connections.cope.enabled);
        assert_eq!(file.export.project_name, "Nave 3");
        assert_eq!(file.export.storey_name, ExportConfig::default().storey_name);
    }

    #[test]
    fn test_empty_project_file_is_default() {
        assert_eq!(ProjectFile::from_json("{}").unwrap(), ProjectFile::default());
    }

    #[test]
    fn test_bad_project_file() {
        assert!(ProjectFile::from_json(r#"{ "building": { "roof": "domo" } }"#).is_err());
    }
}
