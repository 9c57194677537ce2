use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use gem_filter::scoring::{PipelineRecord, ScoreRecord};
use gem_filter::session::{Record, SessionStore};
use gem_filter::tui::{App, Worksheet};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_VALIDATION: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Weighted 1-5 scorecard worksheet (default if no subcommand)
    Scorecard,
    /// Six-stage yes/no checklist worksheet
    Pipeline,
    /// Score one coin from ten metric values (1-5 each)
    Score {
        #[command(flatten)]
        entry: EntryArgs,

        /// Market Context, Sector Flow, Smart Money, Exchange Flow, Volume & OI,
        /// Chart Setup, OBV Strength, Social Buzz, Liquidity, Contract Safety
        #[arg(required = true, allow_negative_numbers = true)]
        scores: Vec<i64>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Run one coin through the six-stage checklist
    Verdict {
        #[command(flatten)]
        entry: EntryArgs,

        /// Discovery, Smart Money, On-Chain, Technical, Sentiment, Liquidity & Safety
        /// (yes/no each)
        #[arg(required = true)]
        answers: Vec<String>,

        #[command(flatten)]
        out: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct EntryArgs {
    /// Coin name or symbol
    #[arg(long)]
    coin: String,

    /// Sector (e.g., AI, DeFi, Gaming)
    #[arg(long, default_value = "")]
    sector: String,

    /// Free-text notes
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also write the row as CSV to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "gem-filter")]
#[command(about = "Score crypto coins by hand and find hidden gems", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/gem-filter/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory for CSV exports (overrides config)
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    gem_filter::logging::init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Scorecard);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match gem_filter::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = gem_filter::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let export_dir = cli
        .export_dir
        .or_else(|| config.export_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    log::debug!("Exports go to {}", export_dir.display());

    let code = match command {
        Commands::Scorecard => {
            let theme = gem_filter::tui::resolve_theme(config.theme);
            let app = App::scorecard(config.starting_metric(), export_dir, theme);
            run_worksheet(app, cli.verbose).await
        }
        Commands::Pipeline => {
            let theme = gem_filter::tui::resolve_theme(config.theme);
            run_worksheet(App::pipeline(export_dir, theme), cli.verbose).await
        }
        Commands::Score { entry, scores, out } => {
            let metrics = match gem_filter::scoring::validate_metrics(&scores) {
                Ok(m) => m,
                Err(errors) => exit_with_validation_errors(&errors),
            };
            let record = ScoreRecord::new(entry.coin, entry.sector, metrics, entry.notes);
            emit_single(record, &out, |records, colors| {
                records
                    .iter()
                    .map(gem_filter::output::format_score_detail)
                    .chain(std::iter::once(gem_filter::output::format_score_chart(
                        records, colors,
                    )))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
        }
        Commands::Verdict { entry, answers, out } => {
            let answers = match gem_filter::scoring::validate_answers(&answers) {
                Ok(a) => a,
                Err(errors) => exit_with_validation_errors(&errors),
            };
            let record = PipelineRecord::new(entry.coin, entry.sector, &answers, entry.notes);
            let outcome = gem_filter::scoring::compute_verdict(&answers);
            emit_single(record, &out, |records, colors| {
                format!(
                    "{}\n\n{}",
                    gem_filter::output::format_pipeline_table(records, colors),
                    gem_filter::output::format_outcome(&outcome, colors)
                )
            })
        }
    };

    std::process::exit(code);
}

async fn run_worksheet(app: App, verbose: bool) -> i32 {
    let app = match gem_filter::tui::run_tui(app).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Terminal error: {:#}", e);
            return EXIT_IO;
        }
    };

    let unexported = app.unexported_rows();
    if unexported > 0 {
        log::warn!(
            "{} row(s) were never exported and are discarded with the session",
            unexported
        );
    }

    if verbose && app.worksheet.record_count() > 0 {
        let use_colors = gem_filter::output::should_use_colors();
        let table = match &app.worksheet {
            Worksheet::Scorecard { store, .. } => format!(
                "{}\n\n{}",
                gem_filter::output::format_scorecard_table(store.all(), use_colors),
                gem_filter::output::format_score_chart(store.all(), use_colors)
            ),
            Worksheet::Pipeline { store, .. } => {
                gem_filter::output::format_pipeline_table(store.all(), use_colors)
            }
        };
        println!("{}", table);
    }

    EXIT_SUCCESS
}

/// Append one record to a fresh session and print it in the requested format
fn emit_single<R, F>(record: R, out: &OutputArgs, format_table: F) -> i32
where
    R: Record + Serialize,
    F: Fn(&[R], bool) -> String,
{
    let mut store = SessionStore::new();
    if let Err(e) = store.append(record) {
        exit_with_validation_errors(&[e]);
    }

    let rendered = match out.format {
        OutputFormat::Table => Ok(format_table(
            store.all(),
            gem_filter::output::should_use_colors(),
        )),
        OutputFormat::Csv => gem_filter::export::to_csv(store.all()),
        OutputFormat::Json => serde_json::to_string_pretty(store.all()).map_err(Into::into),
    };

    match rendered {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => {
            eprintln!("Failed to render output: {:#}", e);
            return EXIT_IO;
        }
    }

    if let Some(ref path) = out.output {
        if let Err(e) = gem_filter::export::write_csv(path, store.all()) {
            eprintln!("Export error: {:#}", e);
            return EXIT_IO;
        }
        log::info!("Wrote {}", path.display());
    }

    EXIT_SUCCESS
}

fn exit_with_validation_errors(errors: &[gem_filter::ValidationError]) -> ! {
    eprintln!("Validation errors:");
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(EXIT_VALIDATION);
}
