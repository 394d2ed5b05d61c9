//! main.rs: team-draw CLI
//!
//! Two commands over the roster from config.toml:
//!   assign    one draw, printed per group
//!   simulate  fairness trials of the shuffle, with the uniformity verdict
//!
//! `--seed` makes either command reproducible.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use team_engine::team_types::{Roster, TeamAssignment};
use team_engine::{assign, run_fairness_check, validate_strict, EngineConfig, FairnessReport};
use tracing::info;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "team-draw", about = "Fair team assignment with a shuffle fairness check")]
struct Args {
    /// Config file path (defaults to the bundled roster)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,
    /// Reject out-of-range constraints instead of skipping them
    #[arg(long)]
    strict: bool,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw one team assignment
    Assign,
    /// Run the Monte Carlo fairness check
    Simulate {
        /// Number of trials (overrides config)
        #[arg(short = 'n', long)]
        iterations: Option<u64>,
        /// Keep constrained people in the trial pool
        #[arg(long)]
        include_constrained: bool,
        /// Max allowed deviation in percent (overrides config)
        #[arg(long)]
        tolerance: Option<f64>,
    },
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "team_draw=info,team_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let cfg = EngineConfig::load_or_bundled(args.config.as_deref())
        .context("loading roster config")?;
    let roster = cfg.roster();
    if args.strict {
        validate_strict(&roster).context("roster failed strict validation")?;
    }

    let mut rng = match args.seed {
        Some(seed) => {
            info!("🌱 Using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    match args.command {
        Command::Assign => {
            let teams = assign(&roster, &mut rng).context("assigning teams")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&teams)?);
            } else {
                print_teams(&roster, &teams);
            }
        }
        Command::Simulate { iterations, include_constrained, tolerance } => {
            let mut settings = cfg.simulation.clone();
            if let Some(n) = iterations {
                settings.iterations = n;
            }
            if let Some(t) = tolerance {
                settings.tolerance_pct = t;
            }
            settings.include_constrained |= include_constrained;

            let report = run_fairness_check(&roster, &settings, &mut rng)
                .context("running fairness simulation")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
    }
    Ok(())
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_teams(roster: &Roster, teams: &TeamAssignment) {
    info!("🏁 {} people in {} teams", teams.total_members(), roster.team_count);
    for (group, members) in &teams.groups {
        println!("Team {group} ({})", members.len());
        for m in members {
            println!("  {:<16} {:?}", m.name, m.role);
        }
    }
}

fn print_report(report: &FairnessReport) {
    let width = report.pool.iter().map(String::len).max().unwrap_or(4).max(4);

    print!("{:<width$}", "Name");
    for group in 1..=report.team_count {
        print!(" {:>8}", format!("T{group}"));
    }
    println!();

    for (name, row) in &report.statistics {
        print!("{name:<width$}");
        for count in row.values() {
            print!(" {count:>8}");
        }
        println!();
    }

    let v = &report.verdict;
    println!();
    println!(
        "expected {:.2} per team over {} trials, max deviation {:.2}% → {}",
        v.expected_per_group,
        report.iterations,
        v.max_deviation_pct,
        if v.is_uniform { "uniform" } else { "NOT uniform" }
    );
    if let Some(w) = &v.worst_cell {
        println!("worst cell: {} in team {} ({} times)", w.name, w.group, w.count);
    }
}
