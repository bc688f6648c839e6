//! Simulate command - run a metagame evolution and report statistics
//!
//! Thin glue around the engine: load a scoring matrix from a
//! comma-separated text file, run the generational loop, and hand the
//! accumulated statistics to the caller as a summary table or a JSON report
//! for downstream plotting.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use metagame_core::{ScoringMatrix, DEFAULT_CROSSOVER_ODDS, DEFAULT_MUTATION_ODDS};
use metagame_evolve::{
    Bounds, EvolutionParams, Generation, DEFAULT_PODIUM_SIZE, DEFAULT_SURVIVAL_FRACTION,
};

// ============================================================================
// Command arguments
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Scoring matrix file: one comma-separated integer row per archetype
    #[arg(value_name = "MATRIX")]
    pub matrix: PathBuf,

    /// Population size
    #[arg(long, default_value = "100")]
    pub population: usize,

    /// Number of generations to run
    #[arg(long, default_value = "500")]
    pub generations: usize,

    /// Podium seats tracked per generation
    #[arg(long, default_value_t = DEFAULT_PODIUM_SIZE)]
    pub podium: usize,

    /// Fraction of each archetype preserved unchanged per generation
    #[arg(long, default_value_t = DEFAULT_SURVIVAL_FRACTION)]
    pub survival: f64,

    /// Probability that a crossover pass blends a given index pair
    #[arg(long, default_value_t = DEFAULT_CROSSOVER_ODDS)]
    pub crossover_odds: f64,

    /// Probability that a crossover pass mutates a given index pair
    #[arg(long, default_value_t = DEFAULT_MUTATION_ODDS)]
    pub mutation_odds: f64,

    /// Write the full JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Print the JSON report to stdout instead of the summary table
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Report model
// ============================================================================

/// Everything the downstream plotting layer needs from one run.
#[derive(Serialize)]
pub struct RunReport {
    pub generations: usize,
    pub pop_size: usize,
    pub n_archetypes: usize,
    pub seed: Option<u64>,
    pub archetypes: Vec<ArchetypeReport>,
}

#[derive(Serialize)]
pub struct ArchetypeReport {
    pub archetype: usize,
    pub base_points: u32,
    pub average_playrate: f64,
    pub average_winrate: f64,
    pub playrate_bounds: Option<Bounds>,
    pub winrate_bounds: Option<Bounds>,
    pub podium_fraction: f64,
    pub top1_fraction: f64,
    pub playrate_series: Vec<f64>,
    pub winrate_series: Vec<f64>,
}

// ============================================================================
// Orchestration
// ============================================================================

/// Run the simulate command: load, evolve, report.
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let mut rng = create_rng(seed);
    let matrix = load_matrix(&args.matrix)?;
    tracing::info!(
        "Loaded scoring matrix: {} archetypes from {}",
        matrix.n_archetypes(),
        args.matrix.display()
    );

    let params = EvolutionParams {
        survival_fraction: args.survival,
        crossover_odds: args.crossover_odds,
        mutation_odds: args.mutation_odds,
    };
    let mut engine =
        Generation::with_params(args.population, matrix, args.podium, params, &mut rng)?;
    engine.evolve(args.generations, &mut rng);

    let report = build_report(&engine, seed);

    if let Some(path) = &args.report {
        save_report(&report, path)?;
        tracing::info!("Report written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

// ============================================================================
// Steps
// ============================================================================

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn load_matrix(path: &Path) -> Result<ScoringMatrix> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scoring matrix {}", path.display()))?;
    parse_matrix(&text)
        .with_context(|| format!("invalid scoring matrix in {}", path.display()))
}

fn parse_matrix(text: &str) -> Result<ScoringMatrix> {
    let mut rows = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split(',')
            .map(|cell| {
                cell.trim()
                    .parse::<i64>()
                    .with_context(|| format!("line {}: bad entry {:?}", line_no + 1, cell))
            })
            .collect::<Result<Vec<i64>>>()?;
        rows.push(row);
    }
    Ok(ScoringMatrix::from_rows(rows)?)
}

fn build_report(engine: &Generation, seed: Option<u64>) -> RunReport {
    let stats = engine.stats();
    let archetypes = (0..stats.n_archetypes())
        .map(|archetype| ArchetypeReport {
            archetype,
            base_points: stats.base_points(archetype),
            average_playrate: stats.average_playrate(archetype),
            average_winrate: stats.average_winrate(archetype),
            playrate_bounds: stats.playrate_bounds(archetype),
            winrate_bounds: stats.winrate_bounds(archetype),
            podium_fraction: stats.podium_fraction(archetype),
            top1_fraction: stats.top1_fraction(archetype),
            playrate_series: stats.playrate_series(archetype).to_vec(),
            winrate_series: stats.winrate_series(archetype).to_vec(),
        })
        .collect();

    RunReport {
        generations: stats.generations(),
        pop_size: engine.pop_size(),
        n_archetypes: stats.n_archetypes(),
        seed,
        archetypes,
    }
}

fn save_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))
}

fn print_summary(report: &RunReport) {
    println!(
        "Run: {} generations, population {}, {} archetypes",
        report.generations, report.pop_size, report.n_archetypes
    );
    println!(
        "{:>9} {:>11} {:>10} {:>8} {:>7} {:>6}",
        "archetype", "base_pts", "playrate%", "winrate", "podium", "top1"
    );
    for arch in &report.archetypes {
        println!(
            "{:>9} {:>11} {:>10.1} {:>8.3} {:>7.3} {:>6.3}",
            arch.archetype,
            arch.base_points,
            arch.average_playrate,
            arch.average_winrate,
            arch.podium_fraction,
            arch.top1_fraction
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_matrix_basic() {
        let matrix = parse_matrix("0,10,5\n5,0,10\n10,5,0\n").unwrap();
        assert_eq!(matrix.n_archetypes(), 3);
        assert_eq!(matrix.base_points(1), 15);
    }

    #[test]
    fn test_parse_matrix_tolerates_whitespace_and_blank_lines() {
        let matrix = parse_matrix(" 0 , 3\n\n3, 0 \n").unwrap();
        assert_eq!(matrix.n_archetypes(), 2);
        assert_eq!(matrix.row(0), &[0, 3]);
    }

    #[test]
    fn test_parse_matrix_rejects_garbage() {
        assert!(parse_matrix("0,x\n1,0\n").is_err());
        assert!(parse_matrix("0,1\n1,0,2\n").is_err());
        assert!(parse_matrix("0,-1\n1,0\n").is_err());
    }

    #[test]
    fn test_load_matrix_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "0,10,5\n5,0,10\n10,5,0\n").unwrap();

        let matrix = load_matrix(file.path()).unwrap();
        assert_eq!(matrix.n_archetypes(), 3);
    }

    #[test]
    fn test_build_report_covers_all_archetypes() {
        let matrix = parse_matrix("0,10,5\n5,0,10\n10,5,0\n").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut engine = Generation::new(30, matrix, 10, &mut rng).unwrap();
        engine.evolve(10, &mut rng);

        let report = build_report(&engine, Some(42));
        assert_eq!(report.archetypes.len(), 3);
        assert_eq!(report.generations, 10);
        for arch in &report.archetypes {
            assert_eq!(arch.playrate_series.len(), 10);
            assert_eq!(arch.base_points, 15);
        }

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"podium_fraction\""));
    }
}
