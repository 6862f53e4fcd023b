use crate::config::{AppConfig, EngineMode};
use crate::error::AppError;
use crate::ingest::{self, group_by_race, RaceKey, RaceResult};
use crate::report::{render_analysis, render_backtest};
use crate::telemetry;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rse_engine::workflows::backtest::{assess_market, assess_ticket, BacktestSummary};
use rse_engine::workflows::race::{RaceAnalyzer, RaceCard, RunnerRecord};
use rse_engine::{EngineConfig, RaceError};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "rse",
    about = "Rank race runners and propose reproducible 1RSE betting tickets",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one race card and print the recommended ticket
    Analyze(AnalyzeArgs),
    /// Replay past races against their official arrivals
    Backtest(BacktestArgs),
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Override RSE_MODE for this run
    #[arg(long, value_enum)]
    mode: Option<EngineMode>,
    /// JSON engine configuration replacing the preset
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Normalized runners CSV for a single race
    #[arg(long)]
    runners: PathBuf,
    /// Venue of the race (part of the audit seed)
    #[arg(long)]
    venue: String,
    /// Discipline key selecting the domain rules
    #[arg(long)]
    discipline: String,
    /// Source identifier for the audit seed (defaults to the runners file name)
    #[arg(long)]
    source: Option<String>,
    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args, Debug)]
struct BacktestArgs {
    /// Runners CSV carrying date, venue and race columns
    #[arg(long)]
    runners: PathBuf,
    /// Races CSV with discipline and arrival columns
    #[arg(long)]
    races: PathBuf,
    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Analyze(args) => run_analyze(&config, args),
        Command::Backtest(args) => run_backtest(&config, args),
    }
}

fn engine_config(config: &AppConfig, args: &EngineArgs) -> Result<EngineConfig, AppError> {
    let mut source = config.engine.clone();
    if let Some(mode) = args.mode {
        source.mode = mode;
    }
    if let Some(path) = &args.config {
        source.config_path = Some(path.clone());
    }
    Ok(source.resolve()?)
}

fn run_analyze(config: &AppConfig, args: AnalyzeArgs) -> Result<(), AppError> {
    let analyzer = RaceAnalyzer::new(engine_config(config, &args.engine)?);
    let runners = ingest::load_runners(&args.runners)?
        .into_iter()
        .map(|entry| entry.record)
        .collect();

    let source_id = args.source.unwrap_or_else(|| {
        args.runners
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let card = RaceCard {
        source_id,
        venue: args.venue,
        discipline: args.discipline,
        runners,
    };
    let analysis = analyzer.analyze(&card)?;
    info!(
        source = %analysis.source_id,
        schema_len = analysis.schema.len(),
        face = analysis.selection.face,
        "race card analyzed"
    );

    match args.engine.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Text => print!("{}", render_analysis(&analysis)),
    }
    Ok(())
}

fn run_backtest(config: &AppConfig, args: BacktestArgs) -> Result<(), AppError> {
    let analyzer = RaceAnalyzer::new(engine_config(config, &args.engine)?);
    let mut cards = group_by_race(ingest::load_runners(&args.runners)?);
    let races = ingest::load_races(&args.races)?;

    let summary = backtest(&analyzer, &mut cards, races)?;
    info!(
        races = summary.overall.races,
        playable = summary.overall.playable,
        "backtest complete"
    );

    match args.engine.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print!("{}", render_backtest(&summary)),
    }
    Ok(())
}

/// Analyze every race that has runners and tally its ticket against the arrival.
///
/// Cards with duplicate runner numbers are skipped; an unknown discipline
/// still aborts the run.
pub fn backtest(
    analyzer: &RaceAnalyzer,
    cards: &mut BTreeMap<RaceKey, Vec<RunnerRecord>>,
    races: Vec<RaceResult>,
) -> Result<BacktestSummary, AppError> {
    let mut summary = BacktestSummary::default();

    for race in races {
        let Some(runners) = cards.remove(&race.key) else {
            warn!(source = %race.key.source_id(), "no runners for race, skipped");
            continue;
        };

        let card = RaceCard {
            source_id: race.key.source_id(),
            venue: race.key.venue.clone(),
            discipline: race.discipline,
            runners,
        };
        let analysis = match analyzer.analyze(&card) {
            Ok(analysis) => analysis,
            Err(RaceError::DuplicateCandidate(number)) => {
                warn!(
                    source = %card.source_id,
                    number,
                    "race card rejected, skipped"
                );
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let outcome = assess_ticket(analysis.ticket(), &race.arrival);
        let market = assess_market(&card.runners, &race.arrival);
        summary.record(&analysis, outcome.as_ref(), market.as_ref());
    }

    Ok(summary)
}
