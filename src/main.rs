use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use profile_match::analysis::{differentiation_power, influence, strengths_and_weaknesses};
use profile_match::output::{self, ScoreFormat};
use profile_match::scoring::{validate_profile, validate_scoring, MatchingEngine, ScoringConfiguration};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank alternatives by final score (default if no subcommand)
    Rank {
        /// Output layout
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// How scores are rendered in the table
        #[arg(long, value_enum, default_value_t = ScoreFormat::Raw)]
        score_format: ScoreFormat,

        /// Print per-criterion gap scores for every alternative
        #[arg(long)]
        detail: bool,
    },
    /// Per-criterion influence, differentiation power, strengths and weaknesses
    Analyze {
        /// Minimum gap score counted as a strength
        #[arg(long, default_value_t = 4.0)]
        threshold: f64,
    },
}

#[derive(Parser, Debug)]
#[command(name = "profile-match")]
#[command(about = "Rank alternatives against an ideal profile", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to profile file (defaults to ~/.config/profile-match/profile.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "profile_match=debug"
    } else {
        "profile_match=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn print_errors(heading: &str, errors: &[String]) {
    eprintln!("{}", heading);
    for error in errors {
        eprintln!("  - {}", error);
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Rank {
        format: OutputFormat::Table,
        score_format: ScoreFormat::Raw,
        detail: false,
    });
    let start_time = Instant::now();

    let config_path = cli.config.map(PathBuf::from);
    let profile = match profile_match::config::load_config(config_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Report every problem at once before building anything
    let mut errors = Vec::new();
    if let Err(e) = validate_scoring(&profile.scoring) {
        errors.extend(e);
    }
    if let Err(e) = validate_profile(&profile.criteria, &profile.alternatives) {
        errors.extend(e);
    }
    if !errors.is_empty() {
        print_errors("Profile errors:", &errors);
        std::process::exit(EXIT_CONFIG);
    }

    let engine = match ScoringConfiguration::new(profile.scoring)
        .and_then(|config| MatchingEngine::new(config, profile.criteria))
    {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} criteria and {} alternatives (strategy: {})",
            engine.criteria().len(),
            profile.alternatives.len(),
            engine.config().strategy().name()
        );
    }

    let ranked = engine.rank(&profile.alternatives);
    let range = engine.config().score_range();
    let use_colors = output::should_use_colors();

    match command {
        Commands::Rank {
            format,
            score_format,
            detail,
        } => match format {
            OutputFormat::Table if detail => {
                for result in &ranked {
                    println!(
                        "{}\n",
                        output::format_result_detail(result, score_format, range, use_colors)
                    );
                }
            }
            OutputFormat::Table => {
                println!(
                    "{}",
                    output::format_ranked_table(&ranked, score_format, range, use_colors)
                );
            }
            OutputFormat::Tsv => println!("{}", output::format_tsv(&ranked)),
            OutputFormat::Json => match output::format_json(&ranked) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Failed to serialize results: {}", e);
                    std::process::exit(EXIT_FAILURE);
                }
            },
        },
        Commands::Analyze { threshold } => {
            println!(
                "{}\n",
                output::format_criterion_stats("Influence", &influence(&ranked, range), use_colors)
            );
            println!(
                "{}\n",
                output::format_criterion_stats(
                    "Differentiation power",
                    &differentiation_power(&ranked),
                    use_colors
                )
            );
            for result in &ranked {
                let classified = strengths_and_weaknesses(result, threshold, range);
                println!(
                    "{}",
                    output::format_strength_profile(result, &classified, use_colors)
                );
            }
        }
    }

    if cli.verbose {
        eprintln!();
        eprintln!("Total: {} alternatives in {:?}", ranked.len(), start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}
