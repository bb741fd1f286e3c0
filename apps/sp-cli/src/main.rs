mod config;

use clap::{Args, Parser, Subcommand};
use config::{CliError, CliResult, Overrides};
use sp_core::units::{k, pa};
use sp_engine::{PropertyBundle, PropertyEngine, PropertyService};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sp-cli")]
#[command(about = "Steam properties CLI - IAPWS-IF97 water/steam states", long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    /// Engine configuration YAML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Report out-of-range inputs instead of clipping them
    #[arg(long, global = true)]
    strict: bool,
    /// Lower pressure bound [Pa]
    #[arg(long, global = true)]
    p_min: Option<f64>,
    /// Upper pressure bound [Pa]
    #[arg(long, global = true)]
    p_max: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the state at pressure and temperature
    Pt {
        /// Pressure [Pa]
        p: f64,
        /// Temperature [K]
        t: f64,
    },
    /// Evaluate the state at pressure and specific enthalpy
    Ph {
        /// Pressure [Pa]
        p: f64,
        /// Specific enthalpy [J/kg]
        h: f64,
    },
    /// Sweep temperature at fixed pressure
    SweepT {
        /// Pressure [Pa]
        p: f64,
        /// First temperature [K]
        #[arg(long)]
        from: f64,
        /// Last temperature [K]
        #[arg(long)]
        to: f64,
        /// Number of points
        #[arg(long, default_value_t = 11)]
        points: usize,
    },
    /// Print the effective engine configuration as YAML
    Config,
}

#[derive(serde::Serialize)]
struct SweepRow {
    t_k: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    bundle: Option<PropertyBundle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        strict: cli.engine.strict,
        p_min: cli.engine.p_min,
        p_max: cli.engine.p_max,
    };
    let engine_config = config::resolve(cli.engine.config.as_deref(), overrides)?;
    tracing::debug!(?engine_config, "engine configured");
    let engine = PropertyEngine::with_config(engine_config)?;

    match cli.command {
        Commands::Pt { p, t } => {
            let bundle = engine.evaluate_pt(pa(p), k(t))?;
            print_bundle(&bundle, cli.json)
        }
        Commands::Ph { p, h } => {
            let bundle = engine.evaluate_ph(pa(p), h)?;
            print_bundle(&bundle, cli.json)
        }
        Commands::SweepT {
            p,
            from,
            to,
            points,
        } => cmd_sweep_t(&engine, p, from, to, points, cli.json),
        Commands::Config => {
            print!("{}", config::to_yaml(engine.config())?);
            Ok(())
        }
    }
}

fn print_bundle(bundle: &PropertyBundle, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(bundle)?);
        return Ok(());
    }
    println!("Region:      {}", bundle.region);
    println!("Pressure:    {:.3} Pa", bundle.p.value);
    println!("Temperature: {:.4} K", bundle.t.value);
    println!("Density:     {:.6} kg/m³", bundle.rho.value);
    println!("Enthalpy:    {:.3} J/kg", bundle.h);
    println!("Entropy:     {:.4} J/(kg·K)", bundle.s);
    println!("cp:          {:.4} J/(kg·K)", bundle.cp);
    println!("cv:          {:.4} J/(kg·K)", bundle.cv);
    println!("Quality:     {:.6}", bundle.x);
    println!("psi:         {:.6e} kg/(m³·Pa)", bundle.psi);
    println!("drho/dh:     {:.6e} kg²/(m³·J)", bundle.drhodh);
    println!("Viscosity:   {:.6e} Pa·s", bundle.mu.value);
    println!("Conductivity:{:.6} W/(m·K)", bundle.kappa.value);
    Ok(())
}

fn sweep_points(from: f64, to: f64, points: usize) -> CliResult<Vec<f64>> {
    if points < 2 {
        return Err(CliError::Sweep("need at least 2 points".to_string()));
    }
    if !from.is_finite() || !to.is_finite() || to <= from {
        return Err(CliError::Sweep(format!("invalid range {from}..{to}")));
    }
    let step = (to - from) / (points - 1) as f64;
    Ok((0..points).map(|i| from + step * i as f64).collect())
}

fn cmd_sweep_t(
    engine: &PropertyEngine,
    p: f64,
    from: f64,
    to: f64,
    points: usize,
    json: bool,
) -> CliResult<()> {
    let temperatures = sweep_points(from, to, points)?;
    let cells: Vec<_> = temperatures.iter().map(|&t| (pa(p), k(t))).collect();
    let results = engine.evaluate_pt_batch(&cells);

    let rows: Vec<SweepRow> = temperatures
        .iter()
        .zip(results)
        .map(|(&t_k, result)| match result {
            Ok(bundle) => SweepRow {
                t_k,
                bundle: Some(bundle),
                error: None,
            },
            Err(e) => SweepRow {
                t_k,
                bundle: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:>10}  {:>14}  {:>12}  {:>14}  {:>12}  {:>8}",
        "T [K]", "region", "rho [kg/m³]", "h [J/kg]", "cp", "x"
    );
    for row in &rows {
        match (&row.bundle, &row.error) {
            (Some(b), _) => println!(
                "{:>10.3}  {:>14}  {:>12.5}  {:>14.3}  {:>12.3}  {:>8.4}",
                row.t_k,
                b.region.to_string(),
                b.rho.value,
                b.h,
                b.cp,
                b.x
            ),
            (None, Some(e)) => println!("{:>10.3}  error: {}", row.t_k, e),
            (None, None) => {}
        }
    }
    let failed = rows.iter().filter(|r| r.bundle.is_none()).count();
    if failed > 0 {
        eprintln!("{failed} of {} points failed", rows.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sp-cli", "pt", "100000", "300", "--strict", "--json"])
            .unwrap();
        assert!(cli.engine.strict);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Pt { .. }));
    }

    #[test]
    fn sweep_points_cover_range() {
        let points = sweep_points(300.0, 400.0, 5).unwrap();
        assert_eq!(points, vec![300.0, 325.0, 350.0, 375.0, 400.0]);
        assert!(sweep_points(300.0, 400.0, 1).is_err());
        assert!(sweep_points(400.0, 300.0, 5).is_err());
    }
}
