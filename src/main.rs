use std::path::PathBuf;

use clap::{Parser, Subcommand};
use toughdata_xlsx::io::excel_read;
use toughdata_xlsx::{Result, ToolError, export};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Convert(args) => execute_convert(args),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_directive = if verbose {
        "toughdata_xlsx=debug"
    } else {
        "toughdata_xlsx=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_convert(args: ConvertArgs) -> Result<()> {
    let workbook = export::convert_file(&args.input, &args.output)?;
    for table in &workbook.tables {
        info!(
            sheet = %table.sheet_name,
            rows = table.rows.len(),
            columns = table.columns.len(),
            "sheet summary"
        );
    }
    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let workbook = excel_read::read_workbook(&args.input)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&workbook)?);
    } else {
        for table in &workbook.tables {
            println!(
                "{}: {} columns, {} rows",
                table.sheet_name,
                table.columns.len(),
                table.rows.len()
            );
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert follower scraper JSON into a Profiles/Videos Excel workbook."
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a scraper JSON file into an .xlsx workbook.
    Convert(ConvertArgs),
    /// Summarise the sheets of an existing workbook.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Scraper JSON file (an array of profile records).
    #[arg(long)]
    input: PathBuf,

    /// Output workbook path. Must end in .xlsx.
    #[arg(long)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Workbook to read.
    #[arg(long)]
    input: PathBuf,

    /// Print the full sheet contents as JSON.
    #[arg(long)]
    json: bool,
}
