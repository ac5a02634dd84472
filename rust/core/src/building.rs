// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building parameters - the root of every generation pass

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roof shape of the portal frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoofType {
    /// Both eaves at eave height, one rafter eave to eave
    #[serde(rename = "plana", alias = "flat")]
    Flat,
    /// Right eave raised by `span * slope` (lowered when the slope is
    /// negative), one rafter eave to eave
    #[serde(rename = "una_agua", alias = "single_slope")]
    SingleSlope,
    /// Both eaves at eave height, two rafters meeting at a central ridge
    #[default]
    #[serde(rename = "dos_aguas", alias = "dual_slope")]
    DualSlope,
}

impl RoofType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoofType::Flat => "plana",
            RoofType::SingleSlope => "una_agua",
            RoofType::DualSlope => "dos_aguas",
        }
    }
}

impl fmt::Display for RoofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoofType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plana" | "flat" => Ok(RoofType::Flat),
            "una_agua" | "single_slope" => Ok(RoofType::SingleSlope),
            "dos_aguas" | "dual_slope" => Ok(RoofType::DualSlope),
            _ => Err(Error::UnknownRoofType(s.to_string())),
        }
    }
}

/// Building parameters. Immutable during a generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Building {
    /// Clear span between column axes (m)
    pub span: f64,
    /// Building length along the frame line (m)
    pub length: f64,
    /// Eave height (m)
    pub height: f64,
    /// Number of portal frames (≥ 1)
    pub frames: usize,
    pub roof: RoofType,
    /// Roof slope as rise over run. Negative only on single-slope roofs,
    /// where it puts the high eave on the left.
    pub slope: f64,
}

impl Default for Building {
    fn default() -> Self {
        Self {
            span: 20.0,
            length: 30.0,
            height: 6.0,
            frames: 6,
            roof: RoofType::DualSlope,
            slope: 0.1,
        }
    }
}

impl Building {
    /// Reject parameters that cannot produce a frame.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("span", self.span),
            ("length", self.length),
            ("height", self.height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidBuilding(format!(
                    "{} must be a positive length, got {}",
                    field, value
                )));
            }
        }
        if self.frames < 1 {
            return Err(Error::InvalidBuilding(
                "at least one frame is required".to_string(),
            ));
        }
        if !self.slope.is_finite() {
            return Err(Error::InvalidBuilding(format!(
                "slope must be finite, got {}",
                self.slope
            )));
        }
        match self.roof {
            RoofType::DualSlope if self.slope < 0.0 => {
                return Err(Error::InvalidBuilding(format!(
                    "dual-slope roof needs a slope of zero or more, got {}",
                    self.slope
                )));
            }
            RoofType::SingleSlope if self.height + self.span * self.slope <= 0.0 => {
                return Err(Error::InvalidBuilding(format!(
                    "slope {} puts the low eave at or below the ground",
                    self.slope
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// Spacing between consecutive frames; the full length when there is
    /// a single frame.
    pub fn step(&self) -> f64 {
        if self.frames <= 1 {
            self.length
        } else {
            self.length / (self.frames - 1) as f64
        }
    }

    /// Position of frame `index` along the building length.
    #[inline]
    pub fn frame_z(&self, index: usize) -> f64 {
        index as f64 * self.step()
    }

    #[inline]
    pub fn half_span(&self) -> f64 {
        self.span / 2.0
    }

    /// Height of the ridge (dual slope) or the high eave (single slope).
    pub fn apex_height(&self) -> f64 {
        match self.roof {
            RoofType::Flat => self.height,
            RoofType::SingleSlope => self.height + (self.span * self.slope).max(0.0),
            RoofType::DualSlope => self.height + self.half_span() * self.slope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_frame_step_is_length() {
        let building = Building {
            frames: 1,
            ..Default::default()
        };
        assert_relative_eq!(building.step(), building.length);
        assert_relative_eq!(building.frame_z(0), 0.0);
    }

    #[test]
    fn test_step_divides_length() {
        let building = Building {
            length: 30.0,
            frames: 4,
            ..Default::default()
        };
        assert_relative_eq!(building.step(), 10.0);
        assert_relative_eq!(building.frame_z(3), 30.0);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert!(Building::default().validate().is_ok());
        for bad in [
            Building { span: 0.0, ..Default::default() },
            Building { length: -1.0, ..Default::default() },
            Building { height: f64::NAN, ..Default::default() },
            Building { frames: 0, ..Default::default() },
            Building { slope: -0.1, ..Default::default() },
            Building { slope: f64::INFINITY, ..Default::default() },
            Building { roof: RoofType::SingleSlope, slope: -0.3, ..Default::default() },
        ] {
            assert!(matches!(bad.validate(), Err(Error::InvalidBuilding(_))));
        }
    }

    #[test]
    fn test_roof_type_names() {
        assert_eq!("plana".parse::<RoofType>().unwrap(), RoofType::Flat);
        assert_eq!("Single_Slope".parse::<RoofType>().unwrap(), RoofType::SingleSlope);
        assert_eq!(" dos_aguas ".parse::<RoofType>().unwrap(), RoofType::DualSlope);
        assert!("gambrel".parse::<RoofType>().is_err());

        let json = serde_json::to_string(&RoofType::SingleSlope).unwrap();
        assert_eq!(json, "\"una_agua\"");
        let roof: RoofType = serde_json::from_str("\"flat\"").unwrap();
        assert_eq!(roof, RoofType::Flat);
    }

    #[test]
    fn test_building_json_defaults() {
        let building: Building = serde_json::from_str(r#"{"span": 12.0, "roof": "plana"}"#).unwrap();
        assert_relative_eq!(building.span, 12.0);
        assert_eq!(building.roof, RoofType::Flat);
        assert_eq!(building.frames, Building::default().frames);
    }

    #[test]
    fn test_apex_height() {
        let building = Building {
            span: 20.0,
            height: 6.0,
            slope: 0.1,
            ..Default::default()
        };
        assert_relative_eq!(building.apex_height(), 7.0);
        let single = Building {
            roof: RoofType::SingleSlope,
            ..building
        };
        assert_relative_eq!(single.apex_height(), 8.0);
    }

    #[test]
    fn test_negative_single_slope_lowers_right_eave() {
        let building = Building {
            roof: RoofType::SingleSlope,
            slope: -0.05,
            ..Default::default()
        };
        assert!(building.validate().is_ok());
        // High eave is the left one, at eave height
        assert_relative_eq!(building.apex_height(), 6.0);

        let flat = Building {
            roof: RoofType::Flat,
            slope: -0.05,
            ..Default::default()
        };
        assert!(flat.validate().is_ok());
    }
}
