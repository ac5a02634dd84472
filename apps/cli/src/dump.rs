// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON dump of a generation pass for inspection and downstream tools.

use portal_core::{Building, Feature, Generation, Member};
use portal_geometry::{Frame, MemberRole, Point3, Vector3};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Dump<'a> {
    pub building: &'a Building,
    pub members: Vec<MemberRecord<'a>>,
    pub features: Vec<FeatureRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct MemberRecord<'a> {
    pub name: &'a str,
    pub role: MemberRole,
    pub profile: &'a str,
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub length: f64,
}

#[derive(Debug, Serialize)]
pub struct AxesRecord {
    pub x: [f64; 3],
    pub y: [f64; 3],
    pub z: [f64; 3],
}

#[derive(Debug, Serialize)]
pub struct FeatureRecord<'a> {
    pub name: &'a str,
    pub kind: &'static str,
    pub connection: &'static str,
    /// 1-based frame number
    pub frame: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
    pub origin: [f64; 3],
    pub axes: AxesRecord,
    #[serde(flatten)]
    pub shape: ShapeRecord<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShapeRecord<'a> {
    Plate {
        width: f64,
        height: f64,
        thickness: f64,
    },
    Bolts {
        bolt_diameter: f64,
        bolt_length: f64,
        pattern: Vec<[f64; 2]>,
    },
    Cut {
        target: &'a str,
        width: f64,
        height: f64,
        depth: f64,
        center_offset: [f64; 3],
    },
}

fn point(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

fn vector(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

fn axes(frame: &Frame) -> AxesRecord {
    AxesRecord {
        x: vector(&frame.x),
        y: vector(&frame.y),
        z: vector(&frame.z),
    }
}

impl<'a> MemberRecord<'a> {
    fn new(member: &'a Member) -> Self {
        Self {
            name: &member.name,
            role: member.role,
            profile: &member.profile_key,
            start: point(&member.start),
            end: point(&member.end),
            length: member.length(),
        }
    }
}

impl<'a> FeatureRecord<'a> {
    fn new(feature: &'a Feature) -> Self {
        let shape = match feature {
            Feature::Plate(p) => ShapeRecord::Plate {
                width: p.width,
                height: p.height,
                thickness: p.thickness,
            },
            Feature::BoltGroup(b) => ShapeRecord::Bolts {
                bolt_diameter: b.bolt_diameter,
                bolt_length: b.bolt_length,
                pattern: b.pattern.iter().map(|p| [p.x, p.y]).collect(),
            },
            Feature::Cut(c) => ShapeRecord::Cut {
                target: &c.target,
                width: c.width,
                height: c.height,
                depth: c.depth,
                center_offset: vector(&c.center_offset),
            },
        };
        let meta = feature.meta();

        Self {
            name: feature.name(),
            kind: feature.kind(),
            connection: meta.connection.as_str(),
            frame: meta.frame + 1,
            side: meta.side.map(|s| s.tag()),
            origin: point(&feature.origin()),
            axes: axes(feature.frame()),
            shape,
        }
    }
}

impl<'a> Dump<'a> {
    pub fn new(generation: &'a Generation) -> Self {
        Self {
            building: &generation.topology().building,
            members: generation.members().iter().map(MemberRecord::new).collect(),
            features: generation.features().iter().map(FeatureRecord::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::{ProjectConfig, RoofType};

    #[test]
    fn test_dump_shape() {
        let mut config = ProjectConfig::default();
        config.building.roof = RoofType::DualSlope;
        config.building.frames = 1;
        let generation = Generation::run(&config).unwrap();

        let value = serde_json::to_value(Dump::new(&generation)).unwrap();
        assert_eq!(value["building"]["roof"], "dos_aguas");
        assert_eq!(value["members"].as_array().unwrap().len(), 4);
        assert_eq!(value["members"][0]["name"], "COL-L-1");
        assert_eq!(value["members"][0]["role"], "column");
        assert_eq!(value["members"][0]["end"][1], 6.0);

        let features = value["features"].as_array().unwrap();
        let baseplate = &features[0];
        assert_eq!(baseplate["kind"], "PLATE");
        assert_eq!(baseplate["connection"], "baseplate");
        assert_eq!(baseplate["frame"], 1);
        assert_eq!(baseplate["side"], "L");
        assert_eq!(baseplate["thickness"], 0.025);

        let cope = features.iter().find(|f| f["kind"] == "CUT").unwrap();
        assert_eq!(cope["target"], "RAF-L-1");
        assert!(cope.get("side").is_some());

        let ridge = features.iter().find(|f| f["connection"] == "ridge").unwrap();
        assert!(ridge.get("side").is_none());
    }
}
