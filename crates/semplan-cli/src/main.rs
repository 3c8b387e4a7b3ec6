//! semplan, the command-line academic record planner.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "semplan", version, about = "Academic record planner")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and initialise the plan
    Init {
        /// Program start, e.g. "AY21/22"
        #[arg(long)]
        start: Option<String>,
    },

    /// Search the module catalog by code or title
    Search {
        query: String,

        /// Maximum number of results
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Add a module from the catalog to a semester
    Add {
        /// Module code, e.g. CS1101S
        code: String,

        /// Target semester, e.g. "21/22 Sem 1"
        #[arg(long)]
        semester: String,
    },

    /// Remove a module from the plan
    Remove { id: String },

    /// Set a module's grade ("none" clears it)
    Grade { id: String, grade: String },

    /// Toggle a module's pass/fail exemption
    Exempt { id: String },

    /// Move a module to another semester
    Move {
        id: String,

        /// Target semester
        #[arg(long)]
        to: String,

        /// Position within the target semester (appends when omitted)
        #[arg(long)]
        index: Option<usize>,
    },

    /// Manage the semesters open for entry
    Semester {
        #[command(subcommand)]
        action: SemesterAction,
    },

    /// Manage the visible academic years
    Year {
        #[command(subcommand)]
        action: YearAction,
    },

    /// Change the program start (drops modules outside the new range)
    SetStart { start: String },

    /// Choose the exemption tier: "high" or "standard"
    Tier { tier: String },

    /// Turn a display toggle on or off
    Toggle {
        /// grade-points, exemption-panel or compact-view
        name: String,

        /// "on" or "off"
        state: String,
    },

    /// List planned modules by semester
    List,

    /// Show scores and remaining exemption quota
    Summary {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum SemesterAction {
    /// Show every semester of the program
    List,
    /// Open a semester for entry
    Add { semester: String },
    /// Remove a semester and all its modules
    Remove { semester: String },
}

#[derive(Subcommand)]
enum YearAction {
    /// Show a year and select it
    Add { year: String },
    /// Remove a year and all its modules
    Remove { year: String },
    /// Select a visible year
    Select { year: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("semplan=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init { start } => commands::init::execute(config, start),
        Commands::Search { query, limit } => commands::search::execute(config, query, limit).await,
        Commands::Add { code, semester } => commands::add::execute(config, code, semester).await,
        Commands::Remove { id } => commands::edit::remove(config, &id),
        Commands::Grade { id, grade } => commands::edit::grade(config, &id, &grade),
        Commands::Exempt { id } => commands::edit::exempt(config, &id),
        Commands::Move { id, to, index } => commands::edit::move_module(config, &id, &to, index),
        Commands::Semester { action } => match action {
            SemesterAction::List => commands::semester::list(config),
            SemesterAction::Add { semester } => commands::semester::add(config, &semester),
            SemesterAction::Remove { semester } => commands::semester::remove(config, &semester),
        },
        Commands::Year { action } => match action {
            YearAction::Add { year } => commands::year::add(config, &year),
            YearAction::Remove { year } => commands::year::remove(config, &year),
            YearAction::Select { year } => commands::year::select(config, &year),
        },
        Commands::SetStart { start } => commands::edit::set_start(config, &start),
        Commands::Tier { tier } => commands::edit::tier(config, &tier),
        Commands::Toggle { name, state } => commands::edit::toggle(config, &name, &state),
        Commands::List => commands::list::execute(config),
        Commands::Summary { format } => commands::summary::execute(config, format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
