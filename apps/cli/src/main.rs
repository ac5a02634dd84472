// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Portal-frame generator CLI.
//!
//! Reads a project file and/or flags, runs one generation pass and writes
//! the building as an IFC4 file. Optionally dumps members and features as
//! JSON and writes a material takeoff.
//!
//! ```text
//! portal-frame --span 24 --length 48 --frames 9 --roof dos_aguas -o nave.ifc
//! portal-frame -p nave.json --takeoff takeoff.json
//! ```

mod args;
mod config;
mod dump;

use anyhow::Context;
use args::{Args, USAGE};
use config::{Config, ProjectFile};
use dump::Dump;
use portal_core::{takeoff, Generation};
use portal_export::encode;
use portal_geometry::ProfileResolver;
use serde::Serialize;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        print!("{}", USAGE);
        return Ok(());
    }

    let env = Config::from_env();
    let mut file = match &args.project {
        Some(path) => ProjectFile::load(path)?,
        None => ProjectFile::default(),
    };
    args.apply(&mut file.project);

    let output = args.output.clone().unwrap_or_else(|| env.output.clone());
    if let Some(name) = output.file_name() {
        file.export.file_name = name.to_string_lossy().into_owned();
    }

    let mut resolver = ProfileResolver::builtin().context("loading built-in profile catalogs")?;
    for path in env.catalogs(&args.catalogs) {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "user".into());
        resolver
            .push_catalog_json(&name, &json)
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        tracing::info!(catalog = %name, "added profile catalog");
    }

    tracing::info!(
        span = file.project.building.span,
        length = file.project.building.length,
        height = file.project.building.height,
        frames = file.project.building.frames,
        roof = %file.project.building.roof,
        "generating portal-frame building"
    );
    let generation = Generation::run(&file.project).context("generating building")?;

    let ifc = encode(&generation, &resolver, &file.export).context("encoding IFC")?;
    std::fs::write(&output, ifc).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(path = %output.display(), "wrote IFC file");

    if let Some(path) = &args.dump_json {
        write_json(path, &Dump::new(&generation))?;
        tracing::info!(path = %path.display(), "wrote generation dump");
    }

    if let Some(path) = &args.takeoff {
        let takeoff = takeoff(&generation, &resolver);
        tracing::info!(
            sections = takeoff.sections.len(),
            plates = takeoff.plates.count,
            bolts = takeoff.bolts.bolts,
            total_mass = takeoff.total_mass,
            "material takeoff"
        );
        write_json(path, &takeoff)?;
    }

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
