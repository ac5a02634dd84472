// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material takeoff

use crate::feature::Feature;
use crate::session::Generation;
use portal_geometry::ProfileResolver;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Density of structural steel (kg/m³)
pub const STEEL_DENSITY: f64 = 7850.0;

/// Members sharing one resolved section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionTakeoff {
    /// Resolved catalog key
    pub profile: String,
    pub family: String,
    pub count: usize,
    /// Total length (m)
    pub length: f64,
    /// Total mass (kg)
    pub mass: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlateTakeoff {
    pub count: usize,
    /// Steel volume (m³)
    pub volume: f64,
    /// Mass (kg)
    pub mass: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoltTakeoff {
    pub groups: usize,
    pub bolts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Takeoff {
    /// Sections in order of first use
    pub sections: Vec<SectionTakeoff>,
    pub plates: PlateTakeoff,
    pub bolts: BoltTakeoff,
    pub total_mass: f64,
}

/// Aggregate members per resolved profile, plus plates and bolts.
pub fn takeoff(generation: &Generation, resolver: &ProfileResolver) -> Takeoff {
    let mut sections: Vec<SectionTakeoff> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for member in generation.members() {
        let profile = resolver.resolve_with_role(&member.profile_key, Some(member.role));
        let slot = *index.entry(profile.key.clone()).or_insert_with(|| {
            sections.push(SectionTakeoff {
                profile: profile.key.clone(),
                family: profile.family().to_string(),
                count: 0,
                length: 0.0,
                mass: 0.0,
            });
            sections.len() - 1
        });
        let length = member.length();
        let entry = &mut sections[slot];
        entry.count += 1;
        entry.length += length;
        entry.mass += length * profile.mass_kg_m;
    }

    let mut plates = PlateTakeoff::default();
    let mut bolts = BoltTakeoff::default();
    for feature in generation.features() {
        match feature {
            Feature::Plate(plate) => {
                plates.count += 1;
                plates.volume += plate.volume();
            }
            Feature::BoltGroup(group) => {
                bolts.groups += 1;
                bolts.bolts += group.pattern.len();
            }
            Feature::Cut(_) => {}
        }
    }
    plates.mass = plates.volume * STEEL_DENSITY;

    let total_mass = sections.iter().map(|s| s.mass).sum::<f64>() + plates.mass;
    Takeoff {
        sections,
        plates,
        bolts,
        total_mass,
    }
}
