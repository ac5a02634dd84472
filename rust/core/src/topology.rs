// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building topology - joint coordinates and structural members
//!
//! The model is Y-up: X runs across the span with the frame centred on
//! `x = 0`, Y is vertical and Z runs along the building length. Member
//! names built here are the join keys cut features use to find their
//! target, so both sides go through [`rafter_name`].

use crate::building::{Building, RoofType};
use crate::config::MemberProfiles;
use crate::error::Result;
use nalgebra::{Point3, Vector3};
use portal_geometry::{make_frame, normalize, Frame, MemberRole};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a portal frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn tag(&self) -> &'static str {
        match self {
            Side::Left => "L",
            Side::Right => "R",
        }
    }

    /// Horizontal unit normal pointing into the frame from this side.
    pub fn inward(&self) -> Vector3<f64> {
        match self {
            Side::Left => Vector3::x(),
            Side::Right => -Vector3::x(),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Name of the column on `side` of frame `index` (0-based).
pub fn column_name(side: Side, index: usize) -> String {
    format!("COL-{}-{}", side, index + 1)
}

/// Name of the rafter leaving the eave on `side` of frame `index`.
///
/// Dual-slope frames have one rafter per side; flat and single-slope
/// frames have a single rafter shared by both eaves.
pub fn rafter_name(roof: RoofType, side: Side, index: usize) -> String {
    match roof {
        RoofType::DualSlope => format!("RAF-{}-{}", side, index + 1),
        RoofType::Flat | RoofType::SingleSlope => format!("RAF-{}", index + 1),
    }
}

fn purlin_name(side: Option<Side>, line: usize, bay: usize) -> String {
    match side {
        Some(side) => format!("PUR-{}-{}-{}", side, line + 1, bay + 1),
        None => format!("PUR-{}-{}", line + 1, bay + 1),
    }
}

/// Joint coordinates of one portal frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameJoints {
    pub index: usize,
    pub z: f64,
    pub base_left: Point3<f64>,
    pub base_right: Point3<f64>,
    pub eave_left: Point3<f64>,
    pub eave_right: Point3<f64>,
    /// Dual-slope roofs only
    pub ridge: Option<Point3<f64>>,
}

impl FrameJoints {
    pub fn compute(building: &Building, index: usize) -> Self {
        let z = building.frame_z(index);
        let half = building.half_span();
        let right_eave_height = match building.roof {
            RoofType::SingleSlope => building.height + building.span * building.slope,
            RoofType::Flat | RoofType::DualSlope => building.height,
        };
        let ridge = match building.roof {
            RoofType::DualSlope => Some(Point3::new(0.0, building.apex_height(), z)),
            RoofType::Flat | RoofType::SingleSlope => None,
        };

        Self {
            index,
            z,
            base_left: Point3::new(-half, 0.0, z),
            base_right: Point3::new(half, 0.0, z),
            eave_left: Point3::new(-half, building.height, z),
            eave_right: Point3::new(half, right_eave_height, z),
            ridge,
        }
    }

    pub fn base(&self, side: Side) -> Point3<f64> {
        match side {
            Side::Left => self.base_left,
            Side::Right => self.base_right,
        }
    }

    pub fn eave(&self, side: Side) -> Point3<f64> {
        match side {
            Side::Left => self.eave_left,
            Side::Right => self.eave_right,
        }
    }

    /// Where the rafter leaving the eave on `side` ends: the ridge, or the
    /// opposite eave when there is no ridge.
    pub fn rafter_end(&self, side: Side) -> Point3<f64> {
        match (self.ridge, side) {
            (Some(ridge), _) => ridge,
            (None, Side::Left) => self.eave_right,
            (None, Side::Right) => self.eave_left,
        }
    }

    /// Unit direction of the rafter leaving the eave on `side`.
    pub fn rafter_direction(&self, side: Side) -> Vector3<f64> {
        normalize(&(self.rafter_end(side) - self.eave(side)))
    }

    /// The eave the roof rises to: the right one on single-slope roofs with
    /// positive slope, otherwise the left one.
    pub fn high_side(&self) -> Side {
        if self.eave_right.y > self.eave_left.y {
            Side::Right
        } else {
            Side::Left
        }
    }
}

/// A straight structural bar
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    /// Designation as configured; resolved by the profile resolver
    pub profile_key: String,
    pub role: MemberRole,
}

impl Member {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn direction(&self) -> Vector3<f64> {
        normalize(&(self.end - self.start))
    }

    /// Extrusion frame: Z along the member, section depth (local Y) in the
    /// frame plane for columns and rafters and vertical for purlins.
    pub fn frame(&self) -> Frame {
        make_frame(&self.direction(), &-Vector3::z())
    }
}

/// Frames and members of one building
#[derive(Debug, Clone)]
pub struct Topology {
    pub building: Building,
    pub frames: Vec<FrameJoints>,
    pub members: Vec<Member>,
}

impl Topology {
    /// Validate the building and lay out every frame and member.
    ///
    /// Members come frame by frame (columns, then rafters), followed by
    /// purlins bay by bay.
    pub fn build(building: &Building, profiles: &MemberProfiles) -> Result<Self> {
        building.validate()?;

        let frames: Vec<FrameJoints> = (0..building.frames)
            .map(|i| FrameJoints::compute(building, i))
            .collect();

        let mut members = Vec::new();
        for joints in &frames {
            members.extend(frame_members(building.roof, joints, profiles));
        }
        for bay in frames.windows(2) {
            members.extend(bay_purlins(building.roof, &bay[0], &bay[1], profiles));
        }

        tracing::debug!(
            frames = frames.len(),
            members = members.len(),
            roof = %building.roof,
            "built topology"
        );

        Ok(Self {
            building: building.clone(),
            frames,
            members,
        })
    }

    pub fn roof(&self) -> RoofType {
        self.building.roof
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

fn frame_members(roof: RoofType, joints: &FrameJoints, profiles: &MemberProfiles) -> Vec<Member> {
    let column = |side: Side| Member {
        name: column_name(side, joints.index),
        start: joints.base(side),
        end: joints.eave(side),
        profile_key: profiles.column.clone(),
        role: MemberRole::Column,
    };
    let rafter = |side: Side| Member {
        name: rafter_name(roof, side, joints.index),
        start: joints.eave(side),
        end: joints.rafter_end(side),
        profile_key: profiles.rafter.clone(),
        role: MemberRole::Rafter,
    };

    let mut members = vec![column(Side::Left), column(Side::Right)];
    match roof {
        RoofType::DualSlope => members.extend(Side::BOTH.map(rafter)),
        RoofType::Flat | RoofType::SingleSlope => members.push(rafter(Side::Left)),
    }
    members
}

/// Purlins between two consecutive frames, at `(k + 0.5) / n` along each slope.
fn bay_purlins(
    roof: RoofType,
    from: &FrameJoints,
    to: &FrameJoints,
    profiles: &MemberProfiles,
) -> Vec<Member> {
    let n = profiles.purlins_per_slope;
    let slopes: &[Option<Side>] = match roof {
        RoofType::DualSlope => &[Some(Side::Left), Some(Side::Right)],
        RoofType::Flat | RoofType::SingleSlope => &[None],
    };

    let on_slope = |joints: &FrameJoints, side: Side, t: f64| {
        let eave = joints.eave(side);
        eave + (joints.rafter_end(side) - eave) * t
    };

    let mut purlins = Vec::with_capacity(n * slopes.len());
    for slope in slopes {
        let side = slope.unwrap_or(Side::Left);
        for k in 0..n {
            let t = (k as f64 + 0.5) / n as f64;
            purlins.push(Member {
                name: purlin_name(*slope, k, from.index),
                start: on_slope(from, side, t),
                end: on_slope(to, side, t),
                profile_key: profiles.purlin.clone(),
                role: MemberRole::Purlin,
            });
        }
    }
    purlins
}
