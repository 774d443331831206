//! gtwtable CLI - Convert PLC point CSV projects to gateway routing tables
//!
//! # Commands
//!
//! ```bash
//! gtwtable convert -i project.csv -o gtw_table.json   # Write the routing table
//! gtwtable columns project.csv                        # Show the resolved header
//! gtwtable inspect project.csv                        # Print parsed points, write nothing
//! gtwtable summary gtw_table.json                     # Point counts of a generated table
//! ```

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use gtwtable::logs::{log_error, log_info, log_success, log_warning, LogLevel, LOGGER};
use gtwtable::models::columns;
use gtwtable::parser::split_lines;
use gtwtable::{
    convert_and_write, convert_file, missing_columns, read_input, read_table, summarize,
    ColumnIndex, ConvertError, ConvertOptions, WriteError,
};

#[derive(Parser)]
#[command(name = "gtwtable")]
#[command(version, about = "Convert PLC point CSV projects to MQTT gateway routing tables", long_about = None)]
struct Cli {
    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Also print per-row details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV project file into a gateway routing table
    Convert {
        /// Input CSV project file
        #[arg(short, long = "csv-file")]
        input: PathBuf,

        /// Output gateway table file
        #[arg(short, long = "gtw-file")]
        output: PathBuf,

        /// Write single-line JSON
        #[arg(long)]
        compact: bool,

        /// strftime format of the table timestamp
        #[arg(long)]
        time_format: Option<String>,
    },

    /// Show the column positions resolved from the CSV header
    Columns {
        /// Input CSV project file
        input: PathBuf,
    },

    /// Parse a CSV project file and print the routed points
    Inspect {
        /// Input CSV project file
        input: PathBuf,
    },

    /// Summarize an existing gateway table
    Summary {
        /// Gateway table file
        table: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let options = ConvertOptions::from_env();
    let cli = Cli::parse();

    let level = if cli.quiet {
        LogLevel::Error
    } else if cli.verbose {
        LogLevel::Debug
    } else {
        options.log_level.unwrap_or(LogLevel::Info)
    };
    LOGGER.set_level(level);

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            compact,
            time_format,
        } => {
            let mut options = options;
            if compact {
                options = options.with_compact(true);
            }
            if let Some(format) = time_format {
                options = options.with_time_format(format);
            }
            cmd_convert(&input, &output, &options)
        }

        Commands::Columns { input } => cmd_columns(&input),

        Commands::Inspect { input } => cmd_inspect(&input, &options),

        Commands::Summary { table, json } => cmd_summary(&table, json),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        process::exit(1);
    }
}

fn cmd_convert(input: &Path, output: &Path, options: &ConvertOptions) -> Result<(), ConvertError> {
    log_info("🚀 CSV file parser starting...");

    let conversion = convert_and_write(input, output, options)?;

    log_info(format!(
        "   {} data line(s), encoding {}",
        conversion.input.data_lines,
        conversion.input.encoding.as_deref().unwrap_or("-")
    ));
    log_success(format!(
        "✨ Done: {} points routed ({} digital, {} analog)",
        conversion.table.len(),
        conversion.report.digital,
        conversion.report.analog
    ));
    Ok(())
}

fn cmd_columns(input: &Path) -> Result<(), ConvertError> {
    let csv = read_input(input)?;
    let header = split_lines(&csv.content).map_or("", |(header, _)| header);
    let index = ColumnIndex::resolve(header);

    for (position, name) in index.columns().iter().enumerate() {
        let used = index.index_of(name) == Some(position);
        let note = if !used {
            "  (shadowed by a later duplicate)"
        } else if columns::is_required(name) {
            "  (required)"
        } else if columns::is_known(name) {
            "  (ignored)"
        } else {
            "  (not a project sheet column)"
        };
        println!("[{:2}] '{}'{}", position, name, note);
    }

    let missing = missing_columns(&index);
    if missing.is_empty() {
        log_success("All required columns present");
    } else {
        for name in missing {
            log_warning(format!("Required column '{}' not found", name));
        }
    }
    Ok(())
}

fn cmd_inspect(input: &Path, options: &ConvertOptions) -> Result<(), ConvertError> {
    let conversion = convert_file(input, options)?;

    println!("DPointRouting:");
    for entry in conversion.table.digital() {
        println!(
            "     {} : {} : {} : {}",
            entry.kind(),
            entry.point_number(),
            entry.mqtt_topic(),
            entry.value_expression()
        );
    }
    println!("APointRouting:");
    for entry in conversion.table.analog() {
        println!(
            "     {} : {} : {} : {}",
            entry.kind(),
            entry.point_number(),
            entry.mqtt_topic(),
            entry.value_expression()
        );
    }

    for dropped in &conversion.report.dropped {
        println!("     (line {} skipped: '{}')", dropped.line, dropped.kind);
    }
    Ok(())
}

fn cmd_summary(table: &Path, json: bool) -> Result<(), ConvertError> {
    let document = read_table(table)?;
    let summary = summarize(&document);

    if json {
        let text = serde_json::to_string_pretty(&summary).map_err(WriteError::from)?;
        println!("{}", text);
        return Ok(());
    }

    let max = |n: Option<u64>| n.map_or_else(|| "-".to_string(), |n| n.to_string());

    println!("Table:       {}", table.display());
    println!("Generated:   {}", summary.generated_at);
    println!(
        "Digital:     {} (max point {})",
        summary.digital,
        max(summary.max_digital_number)
    );
    println!(
        "Analog:      {} (max point {})",
        summary.analog,
        max(summary.max_analog_number)
    );
    println!("Subscribed:  {}", summary.subscribed);
    println!("Published:   {}", summary.published);

    if !summary.non_numeric.is_empty() {
        log_warning(format!(
            "Non-numeric point numbers: {}",
            summary.non_numeric.join(", ")
        ));
    }
    Ok(())
}
