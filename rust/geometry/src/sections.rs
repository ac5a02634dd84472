// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section outlines - closed counter-clockwise polygons per section family
//!
//! Outlines are centred on the section bounding box, in metres, with the
//! section depth along local Y. Fillet radii are not modelled.

use crate::catalog::{Profile, SectionDims};
use crate::profile::Polygon2D;
use nalgebra::Point2;

const MM: f64 = 0.001;

/// Smallest side of a rectangular outline, in metres.
pub const MIN_RECT_SIDE: f64 = 0.08;

/// Top flange of a zed is this much narrower than the bottom one, so
/// purlins nest when lapped.
pub const ZED_FLANGE_OFFSET: f64 = 0.005;

/// Outline of a resolved profile.
///
/// Dimensions that cannot form the family's outline (for example a web
/// thicker than the flange) degrade to the rectangular outline.
pub fn polygon_for(profile: &Profile) -> Polygon2D {
    match profile.dims {
        SectionDims::I { h, b, tw, tf } if valid_i(h, b, tw, tf) => {
            i_shape(h * MM, b * MM, tw * MM, tf * MM)
        }
        SectionDims::C { h, b, t, lip } if valid_lipped(h, b, t, lip) => {
            c_shape(h * MM, b * MM, t * MM, lip * MM)
        }
        SectionDims::Z { h, b, t, lip }
            if valid_lipped(h, b - ZED_FLANGE_OFFSET / MM, t, lip) =>
        {
            z_shape(h * MM, b * MM, t * MM, lip * MM)
        }
        dims => {
            let (b, h) = dims.envelope();
            rectangle(b * MM, h * MM)
        }
    }
}

fn valid_i(h: f64, b: f64, tw: f64, tf: f64) -> bool {
    tw > 0.0 && tf > 0.0 && tw < b && 2.0 * tf < h
}

fn valid_lipped(h: f64, b: f64, t: f64, lip: f64) -> bool {
    t > 0.0 && lip > t && 2.0 * t < b && 2.0 * lip < h
}

/// I/H section, 12 corners plus closure
fn i_shape(h: f64, b: f64, tw: f64, tf: f64) -> Polygon2D {
    let half_width = b / 2.0;
    let half_depth = h / 2.0;
    let half_web = tw / 2.0;

    Polygon2D::closed(vec![
        // Bottom flange
        Point2::new(-half_width, -half_depth),
        Point2::new(half_width, -half_depth),
        Point2::new(half_width, -half_depth + tf),
        // Right side of web
        Point2::new(half_web, -half_depth + tf),
        Point2::new(half_web, half_depth - tf),
        // Top flange
        Point2::new(half_width, half_depth - tf),
        Point2::new(half_width, half_depth),
        Point2::new(-half_width, half_depth),
        Point2::new(-half_width, half_depth - tf),
        // Left side of web
        Point2::new(-half_web, half_depth - tf),
        Point2::new(-half_web, -half_depth + tf),
        Point2::new(-half_width, -half_depth + tf),
    ])
}

/// Lipped channel, web on the left, lips turned inward; 12 corners plus closure
fn c_shape(h: f64, b: f64, t: f64, lip: f64) -> Polygon2D {
    let hb = b / 2.0;
    let hh = h / 2.0;

    Polygon2D::closed(vec![
        Point2::new(-hb, -hh),
        Point2::new(hb, -hh),
        // Bottom lip
        Point2::new(hb, -hh + lip),
        Point2::new(hb - t, -hh + lip),
        Point2::new(hb - t, -hh + t),
        // Inside of web
        Point2::new(-hb + t, -hh + t),
        Point2::new(-hb + t, hh - t),
        Point2::new(hb - t, hh - t),
        // Top lip
        Point2::new(hb - t, hh - lip),
        Point2::new(hb, hh - lip),
        Point2::new(hb, hh),
        Point2::new(-hb, hh),
    ])
}

/// Lipped zed: bottom flange to the left, narrower top flange to the right.
///
/// Web/flange and flange/lip junctions stay as explicit vertices on the
/// outer faces; 18 vertices plus closure.
fn z_shape(h: f64, b: f64, t: f64, lip: f64) -> Polygon2D {
    let hh = h / 2.0;
    let hw = t / 2.0;
    let left = hw - b;
    let right = -hw + (b - ZED_FLANGE_OFFSET);

    Polygon2D::closed(vec![
        // Bottom flange, outer face
        Point2::new(left, -hh),
        Point2::new(-hw, -hh),
        Point2::new(hw, -hh),
        // Web, right face
        Point2::new(hw, -hh + t),
        Point2::new(hw, hh - t),
        // Top flange underside and lip
        Point2::new(right - t, hh - t),
        Point2::new(right - t, hh - lip),
        Point2::new(right, hh - lip),
        Point2::new(right, hh - t),
        Point2::new(right, hh),
        // Top flange, outer face
        Point2::new(hw, hh),
        Point2::new(-hw, hh),
        // Web, left face
        Point2::new(-hw, hh - t),
        Point2::new(-hw, -hh + t),
        // Bottom flange topside and lip
        Point2::new(left + t, -hh + t),
        Point2::new(left + t, -hh + lip),
        Point2::new(left, -hh + lip),
        Point2::new(left, -hh + t),
    ])
}

/// Solid rectangle with each side floored at [`MIN_RECT_SIDE`]
fn rectangle(b: f64, h: f64) -> Polygon2D {
    Polygon2D::rectangle(b.max(MIN_RECT_SIDE), h.max(MIN_RECT_SIDE))
}
