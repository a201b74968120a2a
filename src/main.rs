//! Track Cones.
//!
//! Kommandozeile für Streckenrand-Modellierung und Kegel-Platzierung.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use track_cones::engine::{Closure, Side};
use track_cones::use_cases::{self, PruneSelection};
use track_cones::ToolOptions;

fn main() -> Result<()> {
    AppRunner::run()
}

#[derive(Parser)]
#[command(name = "track-cones")]
#[command(about = "Streckenränder modellieren und Kegel entlang beider Ränder setzen")]
#[command(version)]
struct Cli {
    /// Optionen-Datei (Standard: track_cones.toml neben der Binary)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Schliessregel der Mittellinie.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClosureArg {
    /// Geschlossen, wenn Ende und Start näher als `closure_threshold` liegen
    Auto,
    Closed,
    Open,
}

#[derive(Subcommand)]
enum Commands {
    /// Mittellinie (Punktliste) → Kegel-Datei.
    Synthesize {
        /// Punktliste der Mittellinie
        #[arg(long)]
        centerline: PathBuf,

        /// Ziel (.yaml, .yml oder .json)
        #[arg(long)]
        out: PathBuf,

        #[arg(long, value_enum, default_value = "auto")]
        closure: ClosureArg,
    },
    /// Randkonturen (Punktlisten) → Kegel-Datei.
    Trace {
        /// Aussenkontur
        #[arg(long)]
        outer: PathBuf,

        /// Innenkontur (Loch), optional
        #[arg(long)]
        inner: Option<PathBuf>,

        #[arg(long)]
        out: PathBuf,
    },
    /// SLAM-Graph-Dump → beschriftete Kegel.
    Reconstruct {
        #[arg(long)]
        graph: PathBuf,

        #[arg(long)]
        out: PathBuf,

        /// Gefittete Randkurven als JSON schreiben
        #[arg(long)]
        curves: Option<PathBuf>,
    },
    /// Kegel aus einer Kegel-Datei entfernen.
    Prune {
        #[arg(long)]
        cones: PathBuf,

        /// Ziel (Standard: <name>_updated.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Index eines zu entfernenden Kegels (mehrfach möglich)
        #[arg(long = "index")]
        indices: Vec<usize>,

        /// Position "x,y"; der nächste Kegel wird entfernt (mehrfach möglich)
        #[arg(long = "at", value_parser = parse_position)]
        positions: Vec<glam::DVec2>,

        /// Suchradius für `--at`
        #[arg(long, default_value = "1.0")]
        radius: f64,
    },
    /// Kegel-Datei → C-Initialisierer für den Simulator.
    ExportC {
        #[arg(long)]
        cones: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },
    /// Standard-Optionen in die Optionen-Datei schreiben.
    InitConfig {
        /// Bestehende Datei überschreiben
        #[arg(long)]
        force: bool,
    },
}

fn parse_position(value: &str) -> std::result::Result<glam::DVec2, String> {
    let points = track_cones::formats::parse_point_list(value).map_err(|e| e.to_string())?;
    match points.as_slice() {
        [p] => Ok(*p),
        _ => Err(format!("Position \"x,y\" erwartet, erhalten: {}", value)),
    }
}

struct AppRunner;

impl AppRunner {
    fn run() -> Result<()> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("Track Cones v{} startet...", env!("CARGO_PKG_VERSION"));

        let cli = Cli::parse();
        let config_path = cli.config.unwrap_or_else(ToolOptions::config_path);

        if let Commands::InitConfig { force } = cli.command {
            return use_cases::init_config(&config_path, force);
        }
        let options = ToolOptions::load_from_file(&config_path)?;

        match cli.command {
            Commands::Synthesize {
                centerline,
                out,
                closure,
            } => {
                let closure = match closure {
                    ClosureArg::Auto => Closure::Auto {
                        threshold: options.engine.closure_threshold,
                    },
                    ClosureArg::Closed => Closure::Closed,
                    ClosureArg::Open => Closure::Open,
                };
                let layout = use_cases::synthesize_file(&centerline, &out, closure, &options)?;
                log::info!(
                    "{} Kegel ({} innen, {} aussen), Umlaufsinn {:?}, Offset {:?}",
                    layout.markers.len(),
                    layout.count(Side::Inner),
                    layout.count(Side::Outer),
                    layout.winding,
                    layout.strategy
                );
            }
            Commands::Trace { outer, inner, out } => {
                let layout = use_cases::trace_files(&outer, inner.as_deref(), &out, &options)?;
                log::info!("{} Kegel gesetzt", layout.markers.len());
            }
            Commands::Reconstruct { graph, out, curves } => {
                let result =
                    use_cases::reconstruct_file(&graph, &out, curves.as_deref(), &options)?;
                log::info!(
                    "{} Kegel beschriftet ({} innen, {} aussen)",
                    result.markers.len(),
                    result.separation.inner.len(),
                    result.separation.outer.len()
                );
            }
            Commands::Prune {
                cones,
                out,
                indices,
                positions,
                radius,
            } => {
                let selection = PruneSelection {
                    indices,
                    positions,
                    radius,
                };
                let target = use_cases::prune_file(&cones, out.as_deref(), &selection)?;
                log::info!("Bereinigte Datei: {}", target.display());
            }
            Commands::ExportC { cones, out } => {
                let count = use_cases::export_c_file(&cones, &out, &options)?;
                log::info!("{} Kegel exportiert", count);
            }
            Commands::InitConfig { .. } => {}
        }
        Ok(())
    }
}
