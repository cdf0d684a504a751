//! One-shot resolution of a gates document

use std::path::PathBuf;

use clap::Args;
use featuregates_core::into_gates;
use featuregates_engine::{FeatureGates, GateQuery};
use serde_json::Value;

use super::{configure, params, parse_param};

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// JSON file holding the raw gates document
    #[arg(long)]
    pub gates: PathBuf,

    /// TOML gates config (translate rules, filters, logging)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read a single key instead of the whole view
    #[arg(long)]
    pub key: Option<String>,

    /// JSON value returned when --key resolves to nothing
    #[arg(long, requires = "key")]
    pub default: Option<String>,

    /// Filter parameter, repeatable
    #[arg(long = "filter", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub filters: Vec<(String, Value)>,
}

pub fn execute(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.gates)
        .map_err(|err| format!("cannot read {}: {err}", args.gates.display()))?;
    let document: Value = serde_json::from_str(&text)
        .map_err(|err| format!("invalid JSON in {}: {err}", args.gates.display()))?;

    let builder = FeatureGates::builder().gates(into_gates(document)?);
    let gates = configure(builder, args.config.as_deref())?.build()?;
    gates.load()?;

    let default = args
        .default
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(|err| format!("invalid --default JSON: {err}"))?;

    let query = match (args.key, args.filters.is_empty()) {
        (Some(key), true) => match default {
            Some(default) => GateQuery::key_or(key, default),
            None => GateQuery::key(key),
        },
        (Some(key), false) => GateQuery::filtered(key, params(args.filters)),
        (None, false) => GateQuery::filter_all(params(args.filters)),
        (None, true) => GateQuery::all(),
    };

    let value = gates.get(query)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
