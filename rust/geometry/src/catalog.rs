// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Steel section catalogs and designation resolution
//!
//! Resolution runs three stages and always yields a profile:
//!
//! 1. exact key match across catalogs in priority order (regional cold-formed
//!    sections first, then European and American hot-rolled tables)
//! 2. the structural-role default table, keyed by an explicit role hint or by
//!    a role alias found in the designation itself (`COLUMNA`, `RAFTER`, ...)
//! 3. a fixed 80 x 80 mm rectangular bar
//!
//! Catalog dimensions are millimetres; section properties use the catalog
//! units named in each field.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

const ES_COLD_FORMED: &str = include_str!("../data/es_cold_formed.json");
const EU_HOT_ROLLED: &str = include_str!("../data/eu_hot_rolled.json");
const US_WIDE_FLANGE: &str = include_str!("../data/us_wide_flange.json");

/// Key of the terminal rectangular fallback.
pub const FALLBACK_KEY: &str = "RECT80X80";

/// Section family, selects the outline generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionFamily {
    I,
    C,
    Z,
    #[serde(rename = "RECT")]
    Rect,
}

impl fmt::Display for SectionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionFamily::I => "I",
            SectionFamily::C => "C",
            SectionFamily::Z => "Z",
            SectionFamily::Rect => "RECT",
        };
        f.write_str(name)
    }
}

/// Family-specific dimensions in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family")]
pub enum SectionDims {
    /// Doubly symmetric I/H section
    I { h: f64, b: f64, tw: f64, tf: f64 },
    /// Lipped channel
    C { h: f64, b: f64, t: f64, lip: f64 },
    /// Lipped zed
    Z { h: f64, b: f64, t: f64, lip: f64 },
    /// Solid rectangle
    #[serde(rename = "RECT")]
    Rect { b: f64, h: f64 },
}

impl SectionDims {
    pub fn family(&self) -> SectionFamily {
        match self {
            SectionDims::I { .. } => SectionFamily::I,
            SectionDims::C { .. } => SectionFamily::C,
            SectionDims::Z { .. } => SectionFamily::Z,
            SectionDims::Rect { .. } => SectionFamily::Rect,
        }
    }

    /// Overall `(width, depth)` in millimetres.
    pub fn envelope(&self) -> (f64, f64) {
        match *self {
            SectionDims::I { h, b, .. }
            | SectionDims::C { h, b, .. }
            | SectionDims::Z { h, b, .. }
            | SectionDims::Rect { h, b } => (b, h),
        }
    }
}

/// Nominal section properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionProperties {
    pub area_cm2: f64,
    pub iy_cm4: f64,
    pub iz_cm4: f64,
    pub wy_cm3: f64,
    pub wz_cm3: f64,
}

/// Catalog section record. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub key: String,
    #[serde(default)]
    pub standard: String,
    #[serde(default)]
    pub country: String,
    pub dims: SectionDims,
    pub mass_kg_m: f64,
    #[serde(default)]
    pub props: SectionProperties,
}

impl Profile {
    pub fn family(&self) -> SectionFamily {
        self.dims.family()
    }

    /// The terminal fallback: a solid 80 x 80 mm bar.
    pub fn fallback() -> Self {
        Self {
            key: FALLBACK_KEY.to_string(),
            standard: String::new(),
            country: String::new(),
            dims: SectionDims::Rect { b: 80.0, h: 80.0 },
            mass_kg_m: 50.24,
            props: SectionProperties {
                area_cm2: 64.0,
                iy_cm4: 341.33,
                iz_cm4: 341.33,
                wy_cm3: 85.33,
                wz_cm3: 85.33,
            },
        }
    }
}

/// Structural role of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Column,
    Rafter,
    Purlin,
}

/// Role defaults: column takes a stout H, rafter a lighter I, purlin a cold-formed C.
pub const ROLE_DEFAULTS: &[(MemberRole, &str)] = &[
    (MemberRole::Column, "HEA300"),
    (MemberRole::Rafter, "IPE300"),
    (MemberRole::Purlin, "C150X50X15X2"),
];

/// Words that identify a role when they lead a designation.
pub const ROLE_ALIASES: &[(&str, MemberRole)] = &[
    ("COLUMNA", MemberRole::Column),
    ("COLUMN", MemberRole::Column),
    ("PILAR", MemberRole::Column),
    ("COL", MemberRole::Column),
    ("VIGA", MemberRole::Rafter),
    ("BEAM", MemberRole::Rafter),
    ("RAFTER", MemberRole::Rafter),
    ("DINTEL", MemberRole::Rafter),
    ("RAF", MemberRole::Rafter),
    ("CORREA", MemberRole::Purlin),
    ("COSTANERA", MemberRole::Purlin),
    ("PURLIN", MemberRole::Purlin),
    ("PUR", MemberRole::Purlin),
];

impl MemberRole {
    /// Role named by the leading alphabetic run of a normalized designation.
    pub fn from_designation(normalized: &str) -> Option<Self> {
        let word: String = normalized
            .chars()
            .take_while(|c| c.is_alphabetic())
            .collect();
        ROLE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == word)
            .map(|(_, role)| *role)
    }

    pub fn default_designation(&self) -> &'static str {
        ROLE_DEFAULTS
            .iter()
            .find(|(role, _)| role == self)
            .map(|(_, key)| *key)
            .unwrap_or(FALLBACK_KEY)
    }
}

/// Canonical catalog key: trimmed, upper-case, whitespace removed, stray
/// multiplication signs folded to `X` and decimal commas to points.
pub fn normalize_designation(designation: &str) -> String {
    let folded = designation
        .replace("Ã—", "X")
        .replace("Ã\u{97}", "X")
        .replace(['×', '✕'], "X")
        .replace(',', ".");
    folded
        .split_whitespace()
        .collect::<String>()
        .to_uppercase()
}

/// One lookup table of sections
#[derive(Debug, Clone)]
pub struct Catalog {
    pub name: String,
    entries: FxHashMap<String, Profile>,
}

impl Catalog {
    /// Build from profiles; keys are normalized on the way in.
    pub fn new(name: impl Into<String>, profiles: Vec<Profile>) -> Self {
        let entries = profiles
            .into_iter()
            .map(|p| (normalize_designation(&p.key), p))
            .collect();
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Parse a JSON array of profiles.
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let profiles: Vec<Profile> = serde_json::from_str(json).map_err(|source| Error::CatalogLoad {
            name: name.to_string(),
            source,
        })?;
        Ok(Self::new(name, profiles))
    }

    pub fn get(&self, key: &str) -> Option<&Profile> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted keys, for listings.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Which stage of the chain produced a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    Catalog,
    RoleDefault,
    Fallback,
}

/// Priority-ordered catalog search with role defaults and a terminal fallback
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    catalogs: Vec<Catalog>,
    fallback: Profile,
}

impl ProfileResolver {
    /// Resolver over the given catalogs, first = highest priority.
    pub fn new(catalogs: Vec<Catalog>) -> Self {
        Self {
            catalogs,
            fallback: Profile::fallback(),
        }
    }

    /// Bundled catalogs: regional cold-formed, European, American.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(vec![
            Catalog::from_json("ES cold-formed", ES_COLD_FORMED)?,
            Catalog::from_json("EU hot-rolled", EU_HOT_ROLLED)?,
            Catalog::from_json("US wide-flange", US_WIDE_FLANGE)?,
        ]))
    }

    /// Append a catalog at the lowest priority.
    pub fn push_catalog(&mut self, catalog: Catalog) {
        self.catalogs.push(catalog);
    }

    /// Parse and append a JSON catalog at the lowest priority.
    pub fn push_catalog_json(&mut self, name: &str, json: &str) -> Result<()> {
        let catalog = Catalog::from_json(name, json)?;
        tracing::debug!(catalog = name, sections = catalog.len(), "catalog added");
        self.push_catalog(catalog);
        Ok(())
    }

    pub fn catalogs(&self) -> &[Catalog] {
        &self.catalogs
    }

    /// Exact match on a normalized key, in priority order.
    pub fn lookup(&self, designation: &str) -> Option<&Profile> {
        let key = normalize_designation(designation);
        self.catalogs.iter().find_map(|c| c.get(&key))
    }

    /// Resolve a designation. Never fails.
    pub fn resolve(&self, designation: &str) -> &Profile {
        self.resolve_with_stage(designation, None).0
    }

    /// Resolve with a role hint used when the designation itself is unknown.
    pub fn resolve_with_role(&self, designation: &str, role: Option<MemberRole>) -> &Profile {
        self.resolve_with_stage(designation, role).0
    }

    /// Resolve and report which stage matched.
    pub fn resolve_with_stage(
        &self,
        designation: &str,
        role: Option<MemberRole>,
    ) -> (&Profile, ResolutionStage) {
        let key = normalize_designation(designation);
        if let Some(profile) = self.catalogs.iter().find_map(|c| c.get(&key)) {
            return (profile, ResolutionStage::Catalog);
        }

        let role = role.or_else(|| MemberRole::from_designation(&key));
        if let Some(role) = role {
            let default_key = role.default_designation();
            if let Some(profile) = self.catalogs.iter().find_map(|c| c.get(default_key)) {
                tracing::debug!(designation, ?role, default = default_key, "using role default profile");
                return (profile, ResolutionStage::RoleDefault);
            }
        }

        tracing::debug!(designation, "unresolved designation, using rectangular fallback");
        (&self.fallback, ResolutionStage::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ProfileResolver {
        ProfileResolver::builtin().expect("bundled catalogs parse")
    }

    #[test]
    fn test_builtin_catalogs_load() {
        let r = resolver();
        assert_eq!(r.catalogs().len(), 3);
        assert!(r.catalogs().iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_normalize_designation() {
        assert_eq!(normalize_designation(" ipe 300 "), "IPE300");
        assert_eq!(normalize_designation("c150×50×15×2"), "C150X50X15X2");
        assert_eq!(normalize_designation("C150Ã—50Ã—15Ã—2"), "C150X50X15X2");
        assert_eq!(normalize_designation("c150x60x20x2,5"), "C150X60X20X2.5");
    }

    #[test]
    fn test_resolve_is_normalization_idempotent() {
        let r = resolver();
        let a = r.resolve("ipe300");
        let b = r.resolve("IPE300");
        let c = r.resolve(" IPE 300 ");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.key, "IPE300");
        assert_eq!(a.family(), SectionFamily::I);
    }

    #[test]
    fn test_role_word_falls_to_role_default() {
        let r = resolver();
        let (profile, stage) = r.resolve_with_stage("columna", None);
        assert_eq!(stage, ResolutionStage::RoleDefault);
        assert_eq!(profile.key, "HEA300");

        let (profile, stage) = r.resolve_with_stage("unknown-xyz", Some(MemberRole::Column));
        assert_eq!(stage, ResolutionStage::RoleDefault);
        assert_eq!(profile.key, "HEA300");

        let purlin = r.resolve("correa");
        assert_eq!(purlin.family(), SectionFamily::C);
    }

    #[test]
    fn test_unknown_without_role_reaches_fallback() {
        let r = resolver();
        let (profile, stage) = r.resolve_with_stage("unknown-xyz", None);
        assert_eq!(stage, ResolutionStage::Fallback);
        assert_eq!(profile.key, FALLBACK_KEY);
        assert_eq!(profile.family(), SectionFamily::Rect);
    }

    #[test]
    fn test_priority_order_prefers_earlier_catalog() {
        let mut local = Profile::fallback();
        local.key = "IPE300".to_string();
        let r = ProfileResolver::new(vec![
            Catalog::new("local", vec![local]),
            Catalog::from_json("EU hot-rolled", EU_HOT_ROLLED).unwrap(),
        ]);
        assert_eq!(r.resolve("IPE300").family(), SectionFamily::Rect);
    }

    #[test]
    fn test_push_catalog_json() {
        let mut r = resolver();
        let json = r#"[{"key":"SHS100X5","dims":{"family":"RECT","b":100,"h":100},"mass_kg_m":14.4}]"#;
        r.push_catalog_json("extra", json).unwrap();
        assert_eq!(r.resolve("shs 100x5").mass_kg_m, 14.4);
        assert!(r.push_catalog_json("broken", "{").is_err());
    }

    #[test]
    fn test_role_from_designation() {
        assert_eq!(MemberRole::from_designation("COL-L-1"), Some(MemberRole::Column));
        assert_eq!(MemberRole::from_designation("VIGA"), Some(MemberRole::Rafter));
        assert_eq!(MemberRole::from_designation("IPE300"), None);
    }
}
