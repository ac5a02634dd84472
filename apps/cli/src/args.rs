// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line flags

use anyhow::{anyhow, bail, Context};
use portal_core::{ProjectConfig, RoofType};
use std::path::PathBuf;
use std::str::FromStr;

pub const USAGE: &str = "\
Generate a steel portal-frame building and write it as IFC4.

USAGE:
    portal-frame [OPTIONS]

OPTIONS:
    -p, --project <FILE>     Project JSON (building, members, connections, export)
    -o, --output <FILE>      Output .ifc path [env: PORTAL_OUTPUT, default: portal-frame.ifc]
        --span <M>           Clear span between column axes
        --length <M>         Building length along the frames
        --height <M>         Eave height
        --frames <N>         Number of portal frames
        --roof <TYPE>        plana | una_agua | dos_aguas (or flat | single_slope | dual_slope)
        --slope <RATIO>      Roof slope as rise over run
        --purlins <N>        Purlin lines per roof slope (0 disables)
        --stiffeners         Add baseplate and knee stiffeners
        --no-copes           Leave rafter ends uncut
        --catalog <FILE>     Extra profile catalog JSON [env: PORTAL_CATALOG]; repeatable
        --dump-json <FILE>   Write members and features as JSON
        --takeoff <FILE>     Write the material takeoff as JSON
    -h, --help               Print this help
";

/// Parsed flags. Anything left `None` keeps the project file value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub project: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub span: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub frames: Option<usize>,
    pub roof: Option<RoofType>,
    pub slope: Option<f64>,
    pub purlins: Option<usize>,
    pub stiffeners: bool,
    pub no_copes: bool,
    pub catalogs: Vec<PathBuf>,
    pub dump_json: Option<PathBuf>,
    pub takeoff: Option<PathBuf>,
    pub help: bool,
}

impl Args {
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            // Accept both `--flag value` and `--flag=value`
            let (flag, inline) = match flag.split_once('=') {
                Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
                _ => (flag, None),
            };
            let mut value = || {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| anyhow!("{} needs a value", flag))
            };

            match flag.as_str() {
                "-h" | "--help" => parsed.help = true,
                "-p" | "--project" => parsed.project = Some(value()?.into()),
                "-o" | "--output" => parsed.output = Some(value()?.into()),
                "--span" => parsed.span = Some(number(&flag, &value()?)?),
                "--length" => parsed.length = Some(number(&flag, &value()?)?),
                "--height" => parsed.height = Some(number(&flag, &value()?)?),
                "--frames" => parsed.frames = Some(number(&flag, &value()?)?),
                "--roof" => {
                    let roof = value()?;
                    parsed.roof = Some(
                        RoofType::from_str(&roof).map_err(|e| anyhow!("--roof: {}", e))?,
                    );
                }
                "--slope" => parsed.slope = Some(number(&flag, &value()?)?),
                "--purlins" => parsed.purlins = Some(number(&flag, &value()?)?),
                "--stiffeners" => parsed.stiffeners = true,
                "--no-copes" => parsed.no_copes = true,
                "--catalog" => parsed.catalogs.push(value()?.into()),
                "--dump-json" => parsed.dump_json = Some(value()?.into()),
                "--takeoff" => parsed.takeoff = Some(value()?.into()),
                other => bail!("unknown argument '{}'\n\n{}", other, USAGE),
            }
        }

        Ok(parsed)
    }

    /// Override project values with the flags that were given.
    pub fn apply(&self, project: &mut ProjectConfig) {
        let building = &mut project.building;
        if let Some(span) = self.span {
            building.span = span;
        }
        if let Some(length) = self.length {
            building.length = length;
        }
        if let Some(height) = self.height {
            building.height = height;
        }
        if let Some(frames) = self.frames {
            building.frames = frames;
        }
        if let Some(roof) = self.roof {
            building.roof = roof;
        }
        if let Some(slope) = self.slope {
            building.slope = slope;
        }
        if let Some(purlins) = self.purlins {
            project.members.purlins_per_slope = purlins;
        }
        if self.stiffeners {
            project.connections.stiffener.enabled = true;
        }
        if self.no_copes {
            project.connections.cope.enabled = false;
        }
    }
}

fn number<T>(flag: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{} expects a number, got '{}'", flag, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn test_building_flags() {
        let args = parse(&[
            "--span", "24", "--length=42", "--height", "7.5", "--frames", "8", "--roof", "una_agua",
            "--slope", "0.08", "--purlins", "0",
        ])
        .unwrap();
        assert_eq!(args.span, Some(24.0));
        assert_eq!(args.length, Some(42.0));
        assert_eq!(args.height, Some(7.5));
        assert_eq!(args.frames, Some(8));
        assert_eq!(args.roof, Some(RoofType::SingleSlope));
        assert_eq!(args.slope, Some(0.08));
        assert_eq!(args.purlins, Some(0));
    }

    #[test]
    fn test_paths_and_switches() {
        let args = parse(&[
            "-p", "nave.json", "-o", "out.ifc", "--catalog", "a.json", "--catalog", "b.json",
            "--dump-json", "dump.json", "--takeoff", "takeoff.json", "--stiffeners", "--no-copes",
        ])
        .unwrap();
        assert_eq!(args.project, Some(PathBuf::from("nave.json")));
        assert_eq!(args.output, Some(PathBuf::from("out.ifc")));
        assert_eq!(args.catalogs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(args.dump_json, Some(PathBuf::from("dump.json")));
        assert_eq!(args.takeoff, Some(PathBuf::from("takeoff.json")));
        assert!(args.stiffeners);
        assert!(args.no_copes);
    }

    #[test]
    fn test_bad_args() {
        assert!(parse(&["--span"]).is_err());
        assert!(parse(&["--span", "wide"]).is_err());
        assert!(parse(&["--frames", "-2"]).is_err());
        assert!(parse(&["--roof", "domo"]).is_err());
        assert!(parse(&["--colour", "red"]).is_err());
    }

    #[test]
    fn test_apply_overrides_only_given_values() {
        let mut project = ProjectConfig::default();
        let args = parse(&["--roof", "flat", "--frames", "2", "--stiffeners"]).unwrap();
        args.apply(&mut project);

        assert_eq!(project.building.roof, RoofType::Flat);
        assert_eq!(project.building.frames, 2);
        assert_eq!(project.building.span, 20.0);
        assert!(project.connections.stiffener.enabled);
        assert!(project.connections.cope.enabled);
    }
}
