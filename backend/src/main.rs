//! TTD Excel CLI - reshape dispatch workbooks
//!
//! ```bash
//! ttd-excel serve                      # Start HTTP server (port 3000)
//! ttd-excel process input.xlsx        # Write ttd_output.xlsx
//! ttd-excel inspect input.xlsx        # Show parsed header rows as JSON
//! ttd-excel rules                      # Show header and weight rules
//! ```
//!
//! The worksheet defaults to `Sheet5`; `--sheet` or the `TTD_SHEET`
//! environment variable (also read from `.env`) override it.

use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use ttd_excel::{
    describe_rules, error_chain, parse_layout_file, process_file, ColumnResolver,
    TransformOptions, DEFAULT_SHEET,
};

#[derive(Parser)]
#[command(name = "ttd-excel")]
#[command(about = "Reshape TTD dispatch workbooks into the courier upload layout", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a workbook and write the output workbook
    Process {
        /// Input workbook (.xlsx, .xls, ...)
        input: PathBuf,

        /// Output file (default: ttd_output.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worksheet to read
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Print the parsed header rows and resolved columns as JSON
    Inspect {
        /// Input workbook
        input: PathBuf,

        /// Worksheet to read
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Show destination header rules and the category weight table
    Rules,

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Worksheet to read from uploads
        #[arg(short, long)]
        sheet: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process { input, output, sheet } => cmd_process(&input, output.as_deref(), sheet),
        Commands::Inspect { input, sheet } => cmd_inspect(&input, sheet),
        Commands::Rules => cmd_rules(),
        Commands::Serve { port, sheet } => cmd_serve(port, sheet).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        for cause in error_chain(e.as_ref()).iter().skip(1) {
            eprintln!("   caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

/// Options for a run, honoring `--sheet` then `TTD_SHEET`.
fn options_for(sheet: Option<String>) -> TransformOptions {
    let sheet = sheet
        .or_else(|| std::env::var("TTD_SHEET").ok())
        .unwrap_or_else(|| DEFAULT_SHEET.to_string());
    TransformOptions::default().with_sheet(sheet)
}

fn cmd_process(
    input: &Path,
    output: Option<&Path>,
    sheet: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let options = options_for(sheet);
    let result = process_file(input, &options)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&result.file_name));
    fs::write(&output, &result.bytes)?;

    eprintln!(
        "✨ {} rows x {} columns written to {}",
        result.table.row_count,
        result.table.columns.len(),
        output.display()
    );
    Ok(())
}

fn cmd_inspect(input: &Path, sheet: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let options = options_for(sheet);
    let layout = parse_layout_file(input, &options.sheet_name)?;

    let resolved: Vec<_> = ColumnResolver::new(&layout, &options.literal_rules)
        .resolve_all()
        .into_iter()
        .map(|c| {
            json!({
                "position": c.position,
                "header": c.header,
                "source": c.source.to_string(),
            })
        })
        .collect();

    let report = json!({
        "sheet": options.sheet_name,
        "columnCount": layout.column_count,
        "row1": layout.row1,
        "row2": layout.row2,
        "row3": layout.row3,
        "dataRows": layout.data.len(),
        "columns": resolved,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_rules() -> Result<(), Box<dyn std::error::Error>> {
    let options = TransformOptions::default();
    println!("{}", describe_rules(&options.literal_rules));
    println!("{}", options.weight_rules.describe());
    Ok(())
}

async fn cmd_serve(port: u16, sheet: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    ttd_excel::server::start_server(port, options_for(sheet)).await
}
