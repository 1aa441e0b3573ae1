//! Scripted envelope simulation entry point.
//!
//! ```bash
//! envelope-sim <scenario.ron> [content files...]
//! ```
//!
//! Content files extend the scenario's prototype table: `.ron` files are
//! prototype catalogs, `.toml` files hold one prototype named after the file
//! stem. The final envelope states are printed to stdout as JSON; logs go to
//! stderr and honour `RUST_LOG`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use envelope_content::{CatalogLoader, EnvelopePrototype, PrototypeLoader};
use envelope_runtime::{RuntimeConfig, Scenario};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let Some(scenario_path) = args.next() else {
        bail!("usage: envelope-sim <scenario.ron> [content files...]");
    };

    let mut prototypes = Vec::new();
    for path in args {
        prototypes.extend(load_content(&path)?);
    }

    let config = RuntimeConfig::from_env();
    tracing::info!(
        tick = ?config.tick,
        bus_capacity = config.bus_capacity,
        interaction_range = config.interaction_range,
        "starting envelope simulation"
    );

    let scenario = Scenario::load_from_file(&scenario_path)
        .with_context(|| format!("loading scenario {}", scenario_path.display()))?
        .with_prototypes(prototypes);

    let report = scenario.run(config)?;
    tracing::info!(
        elapsed_ms = report.elapsed_ms,
        resolutions = report.resolutions.len(),
        "simulation finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_content(path: &Path) -> Result<Vec<(String, EnvelopePrototype)>> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("ron") => {
            let catalog = CatalogLoader::load(path)?;
            tracing::debug!(path = %path.display(), count = catalog.prototypes.len(), "catalog loaded");
            Ok(catalog.prototypes.into_iter().collect())
        }
        Some("toml") => {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .with_context(|| format!("prototype file {} has no usable name", path.display()))?;
            Ok(vec![(name.to_string(), PrototypeLoader::load(path)?)])
        }
        _ => bail!("unsupported content file {}", path.display()),
    }
}
