use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use method_selector::catalog::{self, Catalog};
use method_selector::output::{self, RankingView, Report};
use method_selector::scoring::{self, InputRecord};
use method_selector::{config, share, telemetry};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_INPUT: i32 = 2;
const EXIT_IO: i32 = 3;
const EXIT_CONFIG: i32 = 4;

/// Where deposit characteristics come from. Later sources override earlier ones:
/// file, then link, then individual assignments.
#[derive(Args, Debug, Default, Clone)]
struct InputArgs {
    /// Set one factor, e.g. -s "thickness=V. Thick" (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// YAML/JSON file mapping factor keys to options
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Shareable link or query string produced by `mms share`
    #[arg(short, long)]
    link: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
struct RankArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Write a JSON report of this result to PATH
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Hide eliminated methods
    #[arg(long)]
    recommended_only: bool,

    /// Show only the N best recommended methods
    #[arg(long, value_name = "N")]
    top: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank all methods for a deposit (default if no subcommand)
    Rank(RankArgs),
    /// Show the score breakdown of a single method
    Method {
        /// Method name as listed by `mms weights` (case-insensitive)
        name: String,

        #[command(flatten)]
        inputs: InputArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check inputs without scoring
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Show the weight table
    Weights {
        /// Only this method
        #[arg(short, long)]
        method: Option<String>,
    },
    /// List factors, their options and the catalog provenance
    Factors {
        /// Print the whole catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a shareable query string for the given inputs
    Share {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Parser, Debug)]
#[command(name = "mms")]
#[command(about = "Underground mining method selector (UBC / Nicholas weights)", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/method-selector/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Alternate weight catalog (defaults to the built-in UBC catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(cli.verbose) {
        eprintln!("Logging disabled: {}", e);
    }

    let settings = match config::load_settings(cli.config.map(PathBuf::from)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Catalog load failure is fatal: never score against a partial catalog
    let catalog_path = cli.catalog.or_else(|| settings.catalog.clone());
    let catalog = match catalog::load_catalog(catalog_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Catalog error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = settings.color.resolve();
    let command = cli.command.unwrap_or(Commands::Rank(RankArgs::default()));

    let code = match command {
        Commands::Rank(args) => run_rank(&catalog, args, use_colors, settings.recommended_only),
        Commands::Method { name, inputs, json } => {
            run_method(&catalog, &name, &inputs, json, use_colors)
        }
        Commands::Validate { inputs } => run_validate(&catalog, &inputs),
        Commands::Weights { method } => run_weights(&catalog, method.as_deref(), use_colors),
        Commands::Factors { json } => run_factors(&catalog, json, use_colors),
        Commands::Share { inputs } => run_share(&catalog, &inputs),
    };

    std::process::exit(code);
}

/// Merge every input source into one record.
fn collect_inputs(catalog: &Catalog, args: &InputArgs) -> Result<InputRecord> {
    let mut record = match &args.file {
        Some(path) => InputRecord::load(path)?,
        None => InputRecord::new(),
    };
    if let Some(link) = &args.link {
        record.merge(share::decode_inputs(catalog, link));
    }
    record.merge(InputRecord::from_assignments(args.set.as_slice())?);
    Ok(record)
}

/// Collect and validate inputs, printing problems to stderr.
/// Returns the exit code to use on failure.
fn validated_inputs(catalog: &Catalog, args: &InputArgs) -> Result<InputRecord, i32> {
    let inputs = match collect_inputs(catalog, args) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            return Err(EXIT_INVALID_INPUT);
        }
    };

    let report = scoring::validate_inputs(catalog, &inputs);
    if !report.is_valid() {
        eprintln!("Input errors:");
        eprintln!("{}", output::format_validation(&report));
        return Err(EXIT_INVALID_INPUT);
    }
    Ok(inputs)
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            EXIT_IO
        }
    }
}

fn run_rank(catalog: &Catalog, args: RankArgs, use_colors: bool, recommended_only: bool) -> i32 {
    let inputs = match validated_inputs(catalog, &args.inputs) {
        Ok(i) => i,
        Err(code) => return code,
    };

    let result = scoring::calculate_scores(catalog, &inputs);
    let report = Report::new(catalog, &inputs, &result);

    if let Some(path) = &args.save {
        if let Err(e) = output::save_report(path, &report) {
            eprintln!("Failed to save report: {:#}", e);
            return EXIT_IO;
        }
    }

    if args.json {
        return print_json(&report);
    }

    let view = RankingView {
        use_colors,
        recommended_only: args.recommended_only || recommended_only,
        top: args.top,
    };
    println!("{}", output::format_ranking(&result, catalog, view));
    if let Some(path) = &args.save {
        eprintln!("Report saved to {}", path.display());
    }
    EXIT_SUCCESS
}

fn run_method(catalog: &Catalog, name: &str, args: &InputArgs, json: bool, use_colors: bool) -> i32 {
    let Some(method) = catalog.find_method(name) else {
        eprintln!(
            "Unknown method '{}'. Known methods: {}",
            name,
            catalog.methods().join(", ")
        );
        return EXIT_INVALID_INPUT;
    };

    let inputs = match validated_inputs(catalog, args) {
        Ok(i) => i,
        Err(code) => return code,
    };

    let result = scoring::calculate_method_result(catalog, method, &inputs);
    if json {
        return print_json(&result);
    }
    println!("{}", output::format_method_detail(&result, catalog, use_colors));
    EXIT_SUCCESS
}

fn run_validate(catalog: &Catalog, args: &InputArgs) -> i32 {
    let inputs = match collect_inputs(catalog, args) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            return EXIT_INVALID_INPUT;
        }
    };

    let report = scoring::validate_inputs(catalog, &inputs);
    println!("{}", output::format_validation(&report));
    if report.is_valid() {
        EXIT_SUCCESS
    } else {
        EXIT_INVALID_INPUT
    }
}

fn run_weights(catalog: &Catalog, method: Option<&str>, use_colors: bool) -> i32 {
    let methods: Vec<&str> = match method {
        Some(name) => match catalog.find_method(name) {
            Some(m) => vec![m],
            None => {
                eprintln!(
                    "Unknown method '{}'. Known methods: {}",
                    name,
                    catalog.methods().join(", ")
                );
                return EXIT_INVALID_INPUT;
            }
        },
        None => catalog.methods().iter().map(String::as_str).collect(),
    };

    println!("{}", output::format_weights(catalog, &methods, use_colors));
    EXIT_SUCCESS
}

fn run_factors(catalog: &Catalog, json: bool, use_colors: bool) -> i32 {
    if json {
        return print_json(catalog);
    }
    println!("{}", output::format_factors(catalog, use_colors));
    EXIT_SUCCESS
}

fn run_share(catalog: &Catalog, args: &InputArgs) -> i32 {
    match collect_inputs(catalog, args) {
        Ok(inputs) => {
            println!("{}", share::encode_inputs(catalog, &inputs));
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            EXIT_INVALID_INPUT
        }
    }
}
