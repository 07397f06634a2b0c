use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use command::{classify_error, Session};
use config::{Config, Overrides};
use std::io;
use std::path::PathBuf;
use symptom_predictor::ConditionPredictor;
use symptom_protocol::{check_output_schema, serialize_json, serialize_json_pretty};

mod command;
mod config;
mod report;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "symptom-checker")]
#[command(about = "Match reported symptoms against a reference dataset of conditions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (overrides SYMPTOM_CHECKER_CONFIG and ./symptom-checker.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference dataset CSV (overrides SYMPTOM_CHECKER_DATASET)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Predictor model directory (overrides SYMPTOM_CHECKER_MODEL_DIR)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check symptoms against the reference dataset
    Check(CheckArgs),

    /// List or search the symptom vocabulary
    Symptoms(SymptomsArgs),

    /// Show dataset statistics
    Stats(StatsArgs),

    /// Train the predictor model from the dataset
    Train(TrainArgs),

    /// Predict likely conditions for free text with the trained model
    Predict(PredictArgs),

    /// Print the capabilities document (JSON)
    Capabilities,

    /// Print the JSON Schema of `check --format json` output
    Schema,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DataFormat {
    Text,
    Json,
}

#[derive(Args)]
struct CheckArgs {
    /// Symptoms as free text; commas separate several symptoms
    symptoms: Vec<String>,

    /// A single symptom (repeatable)
    #[arg(long = "symptom", value_name = "SYMPTOM")]
    symptom: Vec<String>,

    /// Add a configured quick-pick symptom by name (repeatable)
    #[arg(long, value_name = "NAME")]
    quick: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Append predictions from the trained model
    #[arg(long)]
    predict: bool,
}

#[derive(Args)]
struct SymptomsArgs {
    /// Fuzzy filter over the vocabulary
    #[arg(long)]
    search: Option<String>,

    /// Maximum entries to list (default: display.vocabulary_preview)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// List the configured quick-pick symptoms instead
    #[arg(long, conflicts_with = "search")]
    quick_picks: bool,
}

#[derive(Args)]
struct StatsArgs {
    /// Number of most common symptoms/conditions (default: display.stats_top)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    top: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = DataFormat::Text)]
    format: DataFormat,
}

#[derive(Args)]
struct TrainArgs {
    /// Directory to write the model into (default: predictor.model_dir)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct PredictArgs {
    /// Free-text symptom description
    text: String,

    /// Number of predictions (default: predictor.top_k)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    top_k: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = DataFormat::Text)]
    format: DataFormat,
}

impl Commands {
    fn json_output(&self) -> bool {
        match self {
            Self::Check(args) => args.format == ReportFormat::Json,
            Self::Stats(args) => args.format == DataFormat::Json,
            Self::Predict(args) => args.format == DataFormat::Json,
            Self::Capabilities | Self::Schema => true,
            Self::Symptoms(_) | Self::Train(_) => false,
        }
    }
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    let json_output = cli.command.json_output();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let overrides = Overrides {
        config: cli.config,
        dataset: cli.dataset,
        model_dir: cli.model_dir,
    };

    match run(cli.command, &overrides) {
        Ok(()) => Ok(()),
        Err(err) if json_output => {
            log::debug!("{err:?}");
            print_stdout(&serialize_json(&classify_error(&err))?)?;
            std::process::exit(1);
        }
        Err(err) => Err(err),
    }
}

fn run(cmd: Commands, overrides: &Overrides) -> Result<()> {
    let session = || Config::load(overrides).map(Session::new);
    match cmd {
        Commands::Check(args) => run_check(&session()?, args),
        Commands::Symptoms(args) => run_symptoms(&session()?, args),
        Commands::Stats(args) => run_stats(&session()?, args),
        Commands::Train(args) => run_train(&session()?, args),
        Commands::Predict(args) => run_predict(&session()?, args),
        Commands::Capabilities => {
            let capabilities = command::capabilities::detect(&session()?);
            print_stdout(&serialize_json_pretty(&capabilities)?)
        }
        Commands::Schema => print_stdout(&check_output_schema()?),
    }
}

fn run_check(session: &Session, args: CheckArgs) -> Result<()> {
    let display = &session.config.display;
    let symptoms =
        command::check::collect_symptoms(&args.symptoms, &args.symptom, &args.quick, display)?;
    if symptoms.is_empty() {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "no symptoms supplied; pass SYMPTOMS, --symptom or --quick",
            )
            .exit();
    }

    let table = session.load_table()?;
    let mut out = command::check::build_check_output(&table, &symptoms, display);
    if args.predict {
        let predictor = session.predictor(Some(&table));
        out.predictions = Some(command::check::prediction_cards(&predictor, &symptoms));
    }

    let rendered = match args.format {
        ReportFormat::Text => report::render_check_text(&out),
        ReportFormat::Json => serialize_json_pretty(&out)?,
        ReportFormat::Markdown => report::render_check_markdown(&out),
    };
    print_stdout(&rendered)
}

fn run_symptoms(session: &Session, args: SymptomsArgs) -> Result<()> {
    let display = &session.config.display;
    if args.quick_picks {
        return print_stdout(command::symptoms::render_quick_picks(display).trim_end());
    }
    let table = session.load_table()?;
    let limit = args.limit.map(|n| n as usize);
    let text =
        command::symptoms::render_vocabulary(&table, args.search.as_deref(), limit, display);
    print_stdout(text.trim_end())
}

fn run_stats(session: &Session, args: StatsArgs) -> Result<()> {
    let table = session.load_table()?;
    let top = args
        .top
        .map_or(session.config.display.stats_top, |n| n as usize);
    let rendered =
        command::stats::render_stats(&table, top, args.format == DataFormat::Json)?;
    print_stdout(rendered.trim_end())
}

fn run_train(session: &Session, args: TrainArgs) -> Result<()> {
    let table = session.load_table()?;
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| session.config.predictor.model_dir.clone());
    let summary = command::predict::train(&table, &output_dir)?;
    print_stdout(&summary.render())
}

fn run_predict(session: &Session, args: PredictArgs) -> Result<()> {
    let table = match session.load_table() {
        Ok(table) => Some(table),
        Err(err) => {
            log::warn!("{err:#}; skipping the model staleness check");
            None
        }
    };
    let predictor = session.predictor(table.as_ref());
    if !predictor.is_available() {
        log::warn!(
            "No predictor model in {}; run `symptom-checker train` first",
            predictor.model_dir().display()
        );
    }
    let top_k = args
        .top_k
        .map_or(session.config.predictor.top_k, |n| n as usize);
    let out = command::predict::predict(&predictor, &args.text, top_k);
    let rendered = match args.format {
        DataFormat::Text => report::render_predict_text(&out),
        DataFormat::Json => serialize_json_pretty(&out)?,
    };
    print_stdout(rendered.trim_end())
}
