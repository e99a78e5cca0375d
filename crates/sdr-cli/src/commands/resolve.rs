//! One-shot commands: `sdr resolve` and `sdr diff`.

use std::fs;

use anyhow::{Context, Result};
use sdr_config::ConfigMode;
use sdr_discovery::{
    reconcile, EndpointView, Event, FileRegistry, HandlerError, Resolver, StaticRegistry,
};

use super::{load_discovery_config, JsonLinePrinter};

pub fn run_resolve(config_paths: &[String], application: Option<String>) -> Result<()> {
    let (_loaded, dc) = load_discovery_config(config_paths, ConfigMode::Resolve)?;
    let application = application.unwrap_or(dc.application);

    let resolver = Resolver::new(FileRegistry::new(&dc.registry_source));
    let endpoints = resolver.resolve(&application)?;

    for ep in &endpoints {
        println!("{}", serde_json::to_string(ep)?);
    }
    Ok(())
}

pub fn run_diff(from: &str, to: &str, application: &str) -> Result<()> {
    let before = load_snapshot(from)?;
    let after = load_snapshot(to)?;

    let mut view = EndpointView::new();
    let mut silent = |_: &Event| -> Result<(), HandlerError> { Ok(()) };
    reconcile(&mut view, &before.resolve(application)?, &mut silent)?;

    let mut printer = JsonLinePrinter::plain(application);
    reconcile(&mut view, &after.resolve(application)?, &mut printer)?;
    Ok(())
}

fn load_snapshot(path: &str) -> Result<Resolver<StaticRegistry>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read snapshot: {path}"))?;
    let registry =
        StaticRegistry::from_json(&raw).with_context(|| format!("parse snapshot: {path}"))?;
    Ok(Resolver::new(registry))
}
