//! Breachsim CLI: run attack propagation simulations and network analysis
//!
//! Loads a JSON network definition (`{"devices": {..}, "dependencies": [..]}`)
//! or the built-in sample factory, and prints results as tables, JSON or a
//! text report.

use anyhow::{bail, Context, Result};
use breachsim::{
    network_metrics, vulnerability_analysis, AttackScenario, BreachsimConfig, Network,
    NetworkDefinition, SimulationResult, Simulator, TracingSink,
};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "breachsim", version, about = "Cyber-attack propagation simulator for industrial networks")]
struct Cli {
    /// Network definition (JSON)
    #[arg(long, global = true)]
    network: Option<PathBuf>,

    /// Use the built-in smart-factory sample network
    #[arg(long, global = true, conflicts_with = "network")]
    sample: bool,

    /// Simulation/analysis configuration (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Report,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate an attack from one or more entry points
    Simulate {
        /// Entry-point device (repeatable)
        #[arg(long = "entry", required_unless_present = "scenario")]
        entry: Vec<String>,

        /// Attack scenario (JSON: {"attack_entry": [..], "description": ".."})
        #[arg(long, conflicts_with = "entry")]
        scenario: Option<PathBuf>,

        /// Attack description
        #[arg(long, default_value = "")]
        description: String,

        /// Override the configured random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Run a Monte-Carlo batch of this many seeded runs instead of one
        #[arg(long)]
        runs: Option<usize>,
    },
    /// Centrality, high-risk devices, critical paths and topology metrics
    Analyze,
}

/// Log filter used when `RUST_LOG` is unset or empty
const DEFAULT_LOG_FILTER: &str = "info";

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() {
    let directives = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let network = load_network(cli.network.as_deref(), cli.sample)?;
    info!("Loaded network with {} devices", network.device_count());

    match cli.command {
        Commands::Simulate { entry, scenario, description, seed, runs } => {
            let scenario = match scenario {
                Some(path) => load_scenario(&path)?,
                None => AttackScenario::new(entry, description),
            };

            let mut sim_config = config.simulation;
            if let Some(seed) = seed {
                sim_config.seed = seed;
            }
            let simulator = Simulator::new(sim_config);

            match runs {
                Some(runs) => {
                    let summary = simulator.simulate_batch(&network, &scenario, runs)?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                        _ => {
                            let mut table = new_table(&["Metric", "Mean"]);
                            table.add_row(vec!["Runs".to_string(), summary.runs.to_string()]);
                            table.add_row(vec!["Affected devices".to_string(), format!("{:.2}", summary.mean_affected_devices)]);
                            table.add_row(vec!["Propagation rate".to_string(), format!("{:.3}", summary.mean_propagation_rate)]);
                            table.add_row(vec!["Risk increase".to_string(), format!("{:.3}", summary.mean_risk_increase)]);
                            table.add_row(vec!["Attack duration (s)".to_string(), format!("{:.1}", summary.mean_attack_duration)]);
                            table.add_row(vec!["Resilience".to_string(), format!("{:.3}", summary.mean_resilience_score)]);
                            println!("{}", table);

                            let mut freq = new_table(&["Device", "Compromised in"]);
                            for (device, f) in &summary.compromise_frequency {
                                freq.add_row(vec![device.to_string(), format!("{:.1}%", f * 100.0)]);
                            }
                            println!("{}", freq);
                        }
                    }
                }
                None => {
                    let result = simulator.simulate_observed(&network, &scenario, &mut TracingSink)?;
                    print_result(&result, &cli.format)?;
                }
            }
        }
        Commands::Analyze => {
            let report = vulnerability_analysis(&network, &config.analysis);
            let metrics = network_metrics(&network);

            if cli.format == OutputFormat::Json {
                let combined = serde_json::json!({
                    "vulnerability": report,
                    "metrics": metrics,
                });
                println!("{}", serde_json::to_string_pretty(&combined)?);
                return Ok(());
            }

            let mut table = new_table(&["Device", "Risk", "Betweenness", "Closeness", "Degree"]);
            for device in network.devices() {
                let name = device.name();
                let c = &report.centrality_analysis;
                table.add_row(vec![
                    name.to_string(),
                    format!("{:.2}", device.risk_score()),
                    format!("{:.3}", c.betweenness.get(name).copied().unwrap_or(0.0)),
                    format!("{:.3}", c.closeness.get(name).copied().unwrap_or(0.0)),
                    format!("{:.3}", c.degree.get(name).copied().unwrap_or(0.0)),
                ]);
            }
            println!("{}", table);

            let or_na = |v: Option<String>| v.unwrap_or_else(|| "N/A".to_string());
            println!("Most vulnerable: {}", or_na(report.most_vulnerable.map(|d| d.to_string())));
            println!("Most central:    {}", or_na(report.most_central.map(|d| d.to_string())));
            println!("Critical paths:");
            for path in &report.critical_paths {
                let hops: Vec<&str> = path.iter().map(|d| d.as_str()).collect();
                println!("  {}", hops.join(" → "));
            }

            println!();
            println!("Devices:          {}", metrics.node_count);
            println!("Dependencies:     {}", metrics.edge_count);
            println!("Density:          {:.3}", metrics.density);
            println!("Avg clustering:   {:.3}", metrics.average_clustering);
            println!("Weakly connected: {}", metrics.is_weakly_connected);
            println!("Diameter:         {}", or_na(metrics.diameter.map(|d| d.to_string())));
            println!("Avg path length:  {}", or_na(metrics.average_shortest_path.map(|d| format!("{:.3}", d))));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<BreachsimConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Ok(BreachsimConfig::from_yaml_str(&text)?)
        }
        None => Ok(BreachsimConfig::default()),
    }
}

fn load_network(path: Option<&Path>, sample: bool) -> Result<Network> {
    let definition = match (path, sample) {
        (_, true) => NetworkDefinition::sample_factory(),
        (Some(path), false) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading network {}", path.display()))?;
            NetworkDefinition::from_json_str(&text)?
        }
        (None, false) => bail!("no network given: pass --network <file> or --sample"),
    };
    Ok(definition.build()?)
}

fn load_scenario(path: &Path) -> Result<AttackScenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn print_result(result: &SimulationResult, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Report => print!("{}", result.report()),
        OutputFormat::Table => {
            let mut table = new_table(&["Time (s)", "Device", "Risk", "Vector"]);
            for entry in &result.attack_path {
                table.add_row(vec![
                    format!("{:.1}", entry.time),
                    entry.device.to_string(),
                    format!("{:.2}", entry.risk),
                    entry.attack_vector.clone(),
                ]);
            }
            println!("{}", table);
            println!(
                "{}/{} devices compromised ({:.0}%), duration {:.1}s, risk increase {:.3}, resilience {:.2}",
                result.affected_devices,
                result.total_devices,
                result.propagation_rate * 100.0,
                result.attack_duration,
                result.risk_increase,
                result.network_resilience_score
            );
            if !result.critical_devices_compromised.is_empty() {
                let names: Vec<&str> = result
                    .critical_devices_compromised
                    .iter()
                    .map(|d| d.as_str())
                    .collect();
                println!("Critical devices compromised: {}", names.join(", "));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_progress_logged_by_default() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("  ")).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::try_parse_from([
            "breachsim", "--sample", "simulate", "--entry", "PLC", "--entry", "HMI", "--seed", "7",
        ])
        .unwrap();
        assert!(cli.sample);
        match cli.command {
            Commands::Simulate { entry, seed, runs, .. } => {
                assert_eq!(entry, vec!["PLC", "HMI"]);
                assert_eq!(seed, Some(7));
                assert_eq!(runs, None);
            }
            Commands::Analyze => panic!("expected simulate"),
        }
    }
}
