//! Command-line interface for lamdef expansion
//!
//! Expands, checks and lists multiline lambdas in Python files.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lamdef::{
    Config, Diagnostic, DiagnosticFormatter, Expander, Format, IndentStyle, LamdefError,
    RewriteOptions,
};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "lamdef")]
#[command(about = "Expand multiline lambdas (lamdef blocks) in Python source")]
#[command(version)]
#[command(author = "OctoFHIR Team <funyloony@gmail.com>")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (defaults to .lamdefrc lookup)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand lamdef blocks into nested functions
    Expand {
        /// Python file (reads from stdin if not provided)
        file: Option<PathBuf>,
        /// Only expand the block on this 1-based line
        #[arg(short, long)]
        line: Option<usize>,
        /// Rewrite the file instead of printing the result
        #[arg(short, long, requires = "file", conflicts_with = "output")]
        in_place: bool,
        /// Write the result to this file
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        #[command(flatten)]
        rewrite: RewriteArgs,
    },
    /// Report malformed lamdef blocks
    Check {
        /// Python file (reads from stdin if not provided)
        file: Option<PathBuf>,
        /// Diagnostic format
        #[arg(short, long, value_enum)]
        format: Option<Format>,
        #[command(flatten)]
        rewrite: RewriteArgs,
    },
    /// List the lamdef blocks in a file
    List {
        /// Python file (reads from stdin if not provided)
        file: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
        #[command(flatten)]
        rewrite: RewriteArgs,
    },
    /// Print a sample configuration file
    Config,
}

#[derive(Args)]
struct RewriteArgs {
    /// Keyword introducing a block
    #[arg(long)]
    keyword: Option<String>,
    /// Prefix of generated function names
    #[arg(long)]
    prefix: Option<String>,
    /// Body indentation: number of spaces or "tabs"
    #[arg(long)]
    indent: Option<IndentStyle>,
    /// Keep `name = lamdef(...):` as an assignment
    #[arg(long)]
    no_direct_assignment: bool,
}

impl RewriteArgs {
    /// CLI flags applied over the configuration file
    fn options(&self, config: &Config) -> RewriteOptions {
        let mut options = config.rewrite_options();
        if let Some(keyword) = &self.keyword {
            options.keyword = keyword.clone();
        }
        if let Some(prefix) = &self.prefix {
            options.name_prefix = prefix.clone();
        }
        if let Some(indent) = self.indent {
            options.indent = indent;
        }
        if self.no_direct_assignment {
            options.direct_assignment = false;
        }
        options
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    Text,
    Json,
}

/// Source text with the name used in diagnostics
struct Input {
    name: String,
    text: String,
}

fn main() {
    // Setup human-panic for better error messages
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Info,
        (false, 2) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load()?,
    };
    let use_color = !(cli.no_color || config.no_color) && io::stderr().is_terminal();

    match cli.command {
        Commands::Expand {
            file,
            line,
            in_place,
            output,
            rewrite,
        } => {
            let expander = Expander::new(rewrite.options(&config))?;
            let input = read_input(file.as_deref())?;
            handle_expand(&expander, &input, line, in_place, output.as_deref(), use_color)
        }
        Commands::Check {
            file,
            format,
            rewrite,
        } => {
            let expander = Expander::new(rewrite.options(&config))?;
            let input = read_input(file.as_deref())?;
            let format = format.or(config.output_format).unwrap_or_default();
            handle_check(&expander, &input, format, use_color)
        }
        Commands::List {
            file,
            format,
            rewrite,
        } => {
            let expander = Expander::new(rewrite.options(&config))?;
            let input = read_input(file.as_deref())?;
            handle_list(&expander, &input, format, use_color)
        }
        Commands::Config => {
            print!("{}", Config::sample_config());
            Ok(0)
        }
    }
}

fn read_input(file: Option<&Path>) -> anyhow::Result<Input> {
    match file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Input {
                name: path.display().to_string(),
                text,
            })
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read from stdin")?;
            Ok(Input {
                name: "<stdin>".to_string(),
                text,
            })
        }
    }
}

fn handle_expand(
    expander: &Expander,
    input: &Input,
    line: Option<usize>,
    in_place: bool,
    output: Option<&Path>,
    use_color: bool,
) -> anyhow::Result<i32> {
    let result = match line {
        Some(line) => expander.expand_line(&input.text, line),
        None => expander.expand(&input.text),
    };
    let expansion = match result {
        Ok(expansion) => expansion,
        Err(error) => return report_error(error, input, use_color),
    };

    if !expansion.diagnostics.is_empty() {
        print_diagnostics(&expansion.diagnostics, input, Format::Text, use_color);
    }
    for block in &expansion.blocks {
        log::info!(
            "{}:{}: expanded into {} ({} body lines)",
            input.name,
            block.line,
            block.name,
            block.body_lines
        );
    }

    if in_place || output.is_some() {
        let target = match output {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(&input.name),
        };
        if in_place && !expansion.changed() {
            log::info!("{}: nothing to expand", input.name);
            return Ok(0);
        }
        fs::write(&target, &expansion.source)
            .with_context(|| format!("failed to write {}", target.display()))?;
    } else {
        io::stdout()
            .write_all(expansion.source.as_bytes())
            .context("failed to write to stdout")?;
    }
    Ok(0)
}

fn handle_check(
    expander: &Expander,
    input: &Input,
    format: Format,
    use_color: bool,
) -> anyhow::Result<i32> {
    let diagnostics = expander.check(&input.text);
    let failed = diagnostics.iter().any(Diagnostic::is_error);

    match format {
        Format::Json => {
            let formatter = DiagnosticFormatter::new(Format::Json);
            println!("{}", formatter.format_all(&with_file(diagnostics, input)));
        }
        _ if diagnostics.is_empty() => {
            log::info!("{}: no problems found", input.name);
        }
        _ => print_diagnostics(&diagnostics, input, format, use_color),
    }

    Ok(i32::from(failed))
}

fn handle_list(
    expander: &Expander,
    input: &Input,
    format: ListFormat,
    use_color: bool,
) -> anyhow::Result<i32> {
    let listing = match expander.list(&input.text) {
        Ok(listing) => listing,
        Err(error) => return report_error(error, input, use_color),
    };

    match format {
        ListFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        ListFormat::Text => {
            for block in &listing.blocks {
                let target = match &block.direct_assignment {
                    Some(name) => format!(" -> def {name}"),
                    None => String::new(),
                };
                println!(
                    "{}:{}:{}: {}({}) [{} body lines]{}",
                    input.name,
                    block.line,
                    block.column,
                    expander.options().keyword,
                    block.params,
                    block.body_lines,
                    target
                );
            }
            if !listing.diagnostics.is_empty() {
                print_diagnostics(&listing.diagnostics, input, Format::Text, use_color);
            }
        }
    }

    Ok(i32::from(listing.diagnostics.iter().any(Diagnostic::is_error)))
}

fn report_error(error: LamdefError, input: &Input, use_color: bool) -> anyhow::Result<i32> {
    match error.to_diagnostic(&input.text) {
        Some(diagnostic) => {
            print_diagnostics(&[diagnostic], input, Format::Text, use_color);
            Ok(1)
        }
        None => Err(error.into()),
    }
}

fn with_file(diagnostics: Vec<Diagnostic>, input: &Input) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .map(|mut diagnostic| {
            diagnostic.location.file_path = Some(input.name.clone());
            diagnostic
        })
        .collect()
}

fn print_diagnostics(
    diagnostics: &[Diagnostic],
    input: &Input,
    format: Format,
    use_color: bool,
) {
    let formatter = DiagnosticFormatter::new(format);
    #[cfg(feature = "terminal")]
    let formatter = formatter.with_color(use_color);
    #[cfg(not(feature = "terminal"))]
    let _ = use_color;

    eprintln!("{}", formatter.format_all(&with_file(diagnostics.to_vec(), input)));
}
