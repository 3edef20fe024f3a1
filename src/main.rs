use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use pe_shortlist::extract::{ExtractError, FetchError};
use pe_shortlist::matching::{rank_funds, shortlist, Criteria, ShortlistEntry};
use pe_shortlist::model::{CompanyProfile, FundDataset};
use pe_shortlist::output::{self, ScoredRow};
use pe_shortlist::pipeline::{run_pipeline, MatchReport, MatchRequest, Pipeline};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse a company website and shortlist matching funds
    Match {
        /// Company website (a bare domain gets https://)
        url: String,

        /// Extra notes for the model (size, HQ, deal preferences)
        #[arg(long)]
        context: Option<String>,

        /// Skip the model and use keyword heuristics
        #[arg(long)]
        offline: bool,

        /// Model name (overrides OPENAI_MODEL and the config file)
        #[arg(long)]
        model: Option<String>,

        /// Show results in the interactive dashboard
        #[arg(long)]
        tui: bool,
    },
    /// Shortlist funds for a saved company profile (JSON)
    Score {
        /// Profile JSON, or a report written by --json-output
        profile: PathBuf,
    },
    /// Rank every fund for a saved profile, without threshold or cutoff
    Rank {
        /// Profile JSON, or a report written by --json-output
        profile: PathBuf,
    },
    /// Create a config file interactively
    Init,
    /// Remove cached pages
    ClearCache,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "pe-shortlist")]
#[command(about = "Shortlist private-equity buyers for a business", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and per-fund breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pe-shortlist/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fund dataset JSON (defaults to the config value, then the bundled data/pe_funds.json)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Maximum number of shortlisted funds
    #[arg(long, global = true, value_parser = parse_top_k)]
    top_k: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Also write the full result as JSON to this path
    #[arg(long, global = true)]
    json_output: Option<PathBuf>,

    /// Fetch pages fresh and don't write the page cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

/// What `score` writes with `--json-output`, the same shape as a match report minus extraction.
#[derive(Serialize)]
struct ProfileShortlist<'a> {
    company_profile: &'a CompanyProfile,
    shortlist: &'a [ShortlistEntry],
}

fn parse_top_k(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<FetchError>().is_some() || err.downcast_ref::<ExtractError>().is_some()
    {
        EXIT_NETWORK
    } else {
        EXIT_INPUT
    }
}

fn fail(context: &str, err: &anyhow::Error, code: i32) -> ! {
    eprintln!("{}: {:#}", context, err);
    std::process::exit(code);
}

fn load_profile(path: &Path) -> CompanyProfile {
    match CompanyProfile::load(path) {
        Ok(p) => p,
        Err(e) => fail("Input error", &e, EXIT_INPUT),
    }
}

fn write_json_output<T: Serialize>(path: Option<&Path>, value: &T) {
    if let Some(path) = path {
        if let Err(e) = output::save_json(path, value) {
            fail("Failed to write JSON output", &e, EXIT_INPUT);
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match output::to_json_pretty(value) {
        Ok(json) => print!("{}", json),
        Err(e) => fail("Output error", &e, EXIT_INPUT),
    }
}

fn print_shortlist(entries: &[ShortlistEntry], format: OutputFormat, verbose: bool) {
    let rows: Vec<ScoredRow> = entries.iter().map(ScoredRow::from).collect();
    let use_colors = output::should_use_colors();

    match format {
        OutputFormat::Tsv => println!("{}", output::format_tsv(&rows)),
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", output::format_scored_table(&rows, use_colors));
            if verbose {
                for entry in entries {
                    println!();
                    println!(
                        "{}",
                        output::format_breakdown(
                            &entry.fund,
                            entry.score,
                            &entry.rationale.subscores,
                            use_colors
                        )
                    );
                }
            }
        }
    }
}

fn print_report(report: &MatchReport, format: OutputFormat, verbose: bool) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Tsv => print_shortlist(&report.shortlist, format, verbose),
        OutputFormat::Table => {
            let use_colors = output::should_use_colors();
            println!(
                "{}",
                output::format_profile(&report.company_profile, use_colors)
            );
            println!();
            print_shortlist(&report.shortlist, format, verbose);
        }
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // A local .env may carry OPENAI_API_KEY
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    pe_shortlist::logging::init_tracing(cli.verbose);
    let start_time = Instant::now();

    // Commands that don't need config or the dataset
    match &cli.command {
        Commands::Init => {
            if let Err(e) = pe_shortlist::config::init::run_init_wizard(cli.config.clone()) {
                fail("Init failed", &e, EXIT_CONFIG);
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::ClearCache => {
            if let Err(e) = pe_shortlist::extract::clear_cache() {
                fail("Failed to clear cache", &e, EXIT_INPUT);
            }
            println!(
                "Cleared page cache at {}",
                pe_shortlist::extract::get_cache_path().display()
            );
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    // Load config
    let mut config = match pe_shortlist::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => fail("Config error", &e, EXIT_CONFIG),
    };

    if let Err(errors) = pe_shortlist::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let top_k = cli.top_k.unwrap_or(config.top_k);
    let dataset_path = cli
        .dataset
        .clone()
        .or_else(|| config.dataset.clone())
        .unwrap_or_else(pe_shortlist::config::default_dataset_path);

    let dataset = match FundDataset::load(&dataset_path) {
        Ok(d) => d,
        Err(e) => {
            let e: anyhow::Error = e.into();
            fail("Input error", &e, EXIT_INPUT)
        }
    };
    tracing::info!(path = %dataset_path.display(), funds = dataset.len(), "loaded fund dataset");

    let json_output = cli.json_output.as_deref();

    match cli.command {
        Commands::Match {
            url,
            context,
            offline,
            model,
            tui,
        } => {
            if let Some(model) = model.or_else(pe_shortlist::credentials::get_model_from_env) {
                config.model = model;
            }
            let api_key = pe_shortlist::credentials::get_api_key_from_env();
            if api_key.is_none() && !offline && !config.offline {
                tracing::warn!(
                    "{} not set; falling back to heuristic extraction",
                    pe_shortlist::credentials::ENV_API_KEY_VAR
                );
            }

            let pipeline = match Pipeline::from_config(&config, api_key, !cli.no_cache) {
                Ok(p) => p,
                Err(e) => fail("Config error", &e, EXIT_CONFIG),
            };
            let request = MatchRequest {
                url,
                context,
                offline: offline || config.offline,
                top_k,
            };

            if tui {
                let theme = pe_shortlist::tui::ThemeColors::for_theme(pe_shortlist::tui::resolve_theme());
                let app = pe_shortlist::tui::App::new_loading(request, theme);
                let funds = Arc::new(dataset.funds().to_vec());
                if let Err(e) = pe_shortlist::tui::run_tui(app, pipeline, funds).await {
                    fail("Dashboard error", &e, EXIT_INPUT);
                }
            } else {
                let report = match run_pipeline(&pipeline, &request, dataset.funds()).await {
                    Ok(r) => r,
                    Err(e) => fail("Analysis failed", &e, exit_code_for(&e)),
                };
                print_report(&report, cli.format, cli.verbose);
                write_json_output(json_output, &report);
            }
        }
        Commands::Score { profile } => {
            let profile = load_profile(&profile);
            let entries = shortlist(&profile, dataset.funds(), top_k);
            let result = ProfileShortlist {
                company_profile: &profile,
                shortlist: &entries,
            };

            if cli.format == OutputFormat::Json {
                print_json(&result);
            } else {
                print_shortlist(&entries, cli.format, cli.verbose);
            }
            write_json_output(json_output, &result);
        }
        Commands::Rank { profile } => {
            let profile = load_profile(&profile);
            let ranked = rank_funds(&Criteria::from_profile(&profile), dataset.funds());

            match cli.format {
                OutputFormat::Json => print_json(&ranked),
                OutputFormat::Tsv => {
                    let rows: Vec<ScoredRow> = ranked.iter().map(ScoredRow::from).collect();
                    println!("{}", output::format_tsv(&rows));
                }
                OutputFormat::Table => {
                    let rows: Vec<ScoredRow> = ranked.iter().map(ScoredRow::from).collect();
                    println!(
                        "{}",
                        output::format_scored_table(&rows, output::should_use_colors())
                    );
                }
            }
            write_json_output(json_output, &ranked);
        }
        Commands::Init | Commands::ClearCache => {}
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_must_be_positive() {
        let err = Cli::try_parse_from(["pe-shortlist", "--top-k", "0", "score", "p.json"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from(["pe-shortlist", "score", "p.json", "--top-k", "3"]).unwrap();
        assert_eq!(cli.top_k, Some(3));
    }

    #[test]
    fn test_top_k_rejects_non_numbers() {
        assert!(Cli::try_parse_from(["pe-shortlist", "--top-k", "-1", "score", "p.json"]).is_err());
        assert!(parse_top_k("five").is_err());
        assert_eq!(parse_top_k("12"), Ok(12));
    }
}
