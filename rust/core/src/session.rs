// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation pass
//!
//! A [`Generation`] holds the members and features of one pass side by side,
//! so the name contract between cuts and members is checked in one place
//! before anything is encoded. Construction either returns a complete,
//! validated set or an error; partial results are never exposed.

use crate::config::ProjectConfig;
use crate::connections::generate_all;
use crate::error::{Error, Result};
use crate::feature::{Cut, Feature};
use crate::topology::{Member, Topology};
use rustc_hash::FxHashSet;

/// Members and features of one generation pass
#[derive(Debug, Clone)]
pub struct Generation {
    topology: Topology,
    features: Vec<Feature>,
}

impl Generation {
    /// Run topology and every feature generator, then validate the result.
    pub fn run(config: &ProjectConfig) -> Result<Self> {
        let topology = Topology::build(&config.building, &config.members)?;
        let features = generate_all(&topology, &config.connections);
        let generation = Self::from_parts(topology, features)?;

        tracing::info!(
            roof = %generation.topology.roof(),
            frames = generation.topology.frames.len(),
            members = generation.members().len(),
            features = generation.features.len(),
            "generation complete"
        );
        Ok(generation)
    }

    /// Assemble a generation from externally produced parts, validating them.
    pub fn from_parts(topology: Topology, features: Vec<Feature>) -> Result<Self> {
        let generation = Self { topology, features };
        generation.validate()?;
        Ok(generation)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn members(&self) -> &[Member] {
        &self.topology.members
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Cuts targeting `member`, in feature order.
    pub fn cuts_for<'a>(&'a self, member: &'a str) -> impl Iterator<Item = &'a Cut> + 'a {
        self.features
            .iter()
            .filter_map(Feature::as_cut)
            .filter(move |cut| cut.target == member)
    }

    /// Names are unique across members and features, and every cut targets
    /// exactly one member of this pass.
    pub fn validate(&self) -> Result<()> {
        let mut names = FxHashSet::default();
        let all_names = self
            .members()
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.features.iter().map(Feature::name));
        for name in all_names {
            if !names.insert(name) {
                return Err(Error::DuplicateName(name.to_string()));
            }
        }

        let member_names: FxHashSet<&str> =
            self.members().iter().map(|m| m.name.as_str()).collect();
        for cut in self.features.iter().filter_map(Feature::as_cut) {
            if !member_names.contains(cut.target.as_str()) {
                return Err(Error::DanglingCutTarget {
                    cut: cut.name.clone(),
                    target: cut.target.clone(),
                });
            }
        }
        Ok(())
    }
}
