use clap::{Parser as ClapParser, Subcommand};
use std::path::PathBuf;
use zq_parse::cli::{self, CheckOptions, CheckResult, CliError, GlobCommand};
use zq_parse::{GlobOptions, ParseOptions};

#[derive(ClapParser)]
#[command(name = "zq-parse")]
#[command(about = "zq-parse - Parse zq pipeline queries into a JSON syntax tree")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and print its AST as JSON
    Parse {
        /// File holding the query (reads from stdin if not provided)
        file: Option<PathBuf>,

        /// Rule to start from: start, Expr or Type
        #[arg(long)]
        start_rule: Option<String>,

        /// Print the AST on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Check that a query parses
    Check {
        /// The query to check
        query: String,

        /// Rule to start from: start, Expr or Type
        #[arg(long)]
        start_rule: Option<String>,
    },

    /// Translate a glob into the regex a search would use
    Glob {
        pattern: String,

        /// Enable `?`, `[...]` and `{a,b}`
        #[arg(long)]
        extended: bool,

        /// Let `**` cross path separators
        #[arg(long)]
        globstar: bool,

        /// Regex flags; `g` leaves the pattern unanchored
        #[arg(long, default_value = "")]
        flags: String,

        /// Report whether this string matches
        #[arg(long)]
        test: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            file,
            start_rule,
            compact,
        } => run_parse(file, start_rule, compact),
        Commands::Check { query, start_rule } => run_check(query, start_rule),
        Commands::Glob {
            pattern,
            extended,
            globstar,
            flags,
            test,
        } => run_glob(GlobCommand {
            pattern,
            options: GlobOptions {
                extended,
                globstar,
                flags,
            },
            test,
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_parse(
    file: Option<PathBuf>,
    start_rule: Option<String>,
    compact: bool,
) -> Result<(), CliError> {
    let source = cli::read_source(file.as_deref())?;
    let options = ParseOptions { start_rule };
    println!("{}", cli::render_ast(&source, &options, !compact)?);
    Ok(())
}

fn run_check(query: String, start_rule: Option<String>) -> Result<(), CliError> {
    let options = CheckOptions { query, start_rule };
    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
    }
    Ok(())
}

fn run_glob(command: GlobCommand) -> Result<(), CliError> {
    let result = cli::execute_glob(&command)?;
    println!("{}", result.regex);
    if let Some(matched) = result.matched {
        println!("{}", if matched { "match" } else { "no match" });
    }
    Ok(())
}
