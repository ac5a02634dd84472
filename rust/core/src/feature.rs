// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection features: plates, bolt groups and boolean cuts
//!
//! Each feature is placed by an origin and a [`Frame`]; all dimensions are
//! measured along that frame's axes.

use crate::topology::Side;
use nalgebra::{Point2, Point3, Vector3};
use portal_geometry::Frame;
use smallvec::SmallVec;
use std::fmt;

/// Bolt offsets in the plate plane
pub type BoltPattern = SmallVec<[Point2<f64>; 8]>;

/// Connection a feature belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    Baseplate,
    BaseStiffener,
    Knee,
    KneeStiffener,
    Ridge,
    EndPlate,
    Cope,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Baseplate => "baseplate",
            ConnectionKind::BaseStiffener => "base_stiffener",
            ConnectionKind::Knee => "knee",
            ConnectionKind::KneeStiffener => "knee_stiffener",
            ConnectionKind::Ridge => "ridge",
            ConnectionKind::EndPlate => "end_plate",
            ConnectionKind::Cope => "cope",
        }
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a feature came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureMeta {
    pub connection: ConnectionKind,
    /// 0-based frame index
    pub frame: usize,
    /// `None` for features on the frame centreline
    pub side: Option<Side>,
}

impl FeatureMeta {
    pub fn new(connection: ConnectionKind, frame: usize, side: Option<Side>) -> Self {
        Self {
            connection,
            frame,
            side,
        }
    }
}

/// Rectangular plate, `width × height` centred in local XY, extruded
/// `thickness` along local +Z from the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Plate {
    pub name: String,
    pub origin: Point3<f64>,
    pub frame: Frame,
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
    pub meta: FeatureMeta,
}

impl Plate {
    pub fn volume(&self) -> f64 {
        self.width * self.height * self.thickness
    }
}

/// Bolts through a plate.
///
/// The origin lies on the plate mid-plane; every bolt is centred on it
/// along local Z.
#[derive(Debug, Clone, PartialEq)]
pub struct BoltGroup {
    pub name: String,
    pub origin: Point3<f64>,
    pub frame: Frame,
    pub pattern: BoltPattern,
    pub bolt_diameter: f64,
    pub bolt_length: f64,
    pub meta: FeatureMeta,
}

impl BoltGroup {
    /// Global centre of each bolt, in pattern order.
    pub fn bolt_centres(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.pattern
            .iter()
            .map(move |p| self.frame.point_at(&self.origin, &Vector3::new(p.x, p.y, 0.0)))
    }
}

/// Box removed from a member.
///
/// The box centre sits at `origin + frame · center_offset`; width runs
/// along local X, height along Y and depth along Z.
#[derive(Debug, Clone, PartialEq)]
pub struct Cut {
    pub name: String,
    /// Name of the member the box is subtracted from
    pub target: String,
    pub origin: Point3<f64>,
    pub frame: Frame,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub center_offset: Vector3<f64>,
    pub meta: FeatureMeta,
}

impl Cut {
    pub fn center(&self) -> Point3<f64> {
        self.frame.point_at(&self.origin, &self.center_offset)
    }
}

/// Connection feature
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Plate(Plate),
    BoltGroup(BoltGroup),
    Cut(Cut),
}

impl Feature {
    pub fn name(&self) -> &str {
        match self {
            Feature::Plate(p) => &p.name,
            Feature::BoltGroup(b) => &b.name,
            Feature::Cut(c) => &c.name,
        }
    }

    pub fn meta(&self) -> &FeatureMeta {
        match self {
            Feature::Plate(p) => &p.meta,
            Feature::BoltGroup(b) => &b.meta,
            Feature::Cut(c) => &c.meta,
        }
    }

    pub fn origin(&self) -> Point3<f64> {
        match self {
            Feature::Plate(p) => p.origin,
            Feature::BoltGroup(b) => b.origin,
            Feature::Cut(c) => c.origin,
        }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            Feature::Plate(p) => &p.frame,
            Feature::BoltGroup(b) => &b.frame,
            Feature::Cut(c) => &c.frame,
        }
    }

    /// Discriminator as written in member dumps
    pub fn kind(&self) -> &'static str {
        match self {
            Feature::Plate(_) => "PLATE",
            Feature::BoltGroup(_) => "BOLT_GROUP",
            Feature::Cut(_) => "CUT",
        }
    }

    pub fn as_plate(&self) -> Option<&Plate> {
        match self {
            Feature::Plate(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_cut(&self) -> Option<&Cut> {
        match self {
            Feature::Cut(c) => Some(c),
            _ => None,
        }
    }
}
