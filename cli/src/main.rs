//! ddbhistory CLI: run Firehose transformation batches over DynamoDB
//! change-stream records.
//!
//! # Commands
//! ```
//! ddbhistory transform --input <file|-> --output <file|-> [--config <yaml>] [--timeout-ms N]
//! ddbhistory decode    --data <base64> | --envelope <path.json>
//! ddbhistory info
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use ddbhistory_observability::init_tracing;
use std::path::PathBuf;

mod cmd_decode;
mod cmd_transform;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(
    name = "ddbhistory",
    about = "DynamoDB change history: Firehose transformation CLI",
    long_about = "
ddbhistory: turn DynamoDB stream change records delivered through Firehose
into flat, untagged JSON lines for history storage.

Logs are written to stderr; results to stdout unless --output is given.
Log levels come from --log-level or the `log` section of --config.
",
    version
)]
struct Cli {
    /// Global log level (overrides the config file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit JSON structured logs
    #[arg(long, global = true)]
    json_logs: bool,

    /// YAML config file with `transformer` and `log` sections
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform one Firehose transformation event
    Transform {
        /// Event JSON file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Response JSON file, or `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Invocation budget in milliseconds; partial results are discarded when exceeded
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },

    /// Decode a single record and print its normalized form
    Decode {
        /// Base64 record payload, as Firehose delivers it
        #[arg(long, conflicts_with = "envelope", required_unless_present = "envelope")]
        data: Option<String>,
        /// Plain JSON change envelope file (encoded before decoding)
        #[arg(long)]
        envelope: Option<PathBuf>,
        /// Record id to stamp on the output
        #[arg(long, default_value = "local")]
        record_id: String,
        /// Arrival timestamp (epoch ms) to stamp on the output
        #[arg(long, default_value_t = 0)]
        arrival_ts: i64,
    },

    /// Show supported input format and attribute tags
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = CliConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        cfg.log.level = level;
    }
    if cli.json_logs {
        cfg.log.json = true;
    }
    init_tracing(&cfg.log);

    match cli.command {
        Commands::Transform {
            input,
            output,
            timeout_ms,
            pretty,
        } => {
            let opts = cmd_transform::Options {
                input,
                output,
                timeout_ms,
                pretty,
            };
            cmd_transform::run(opts, cfg.transformer).await?;
        }

        Commands::Decode {
            data,
            envelope,
            record_id,
            arrival_ts,
        } => {
            cmd_decode::run(data, envelope.as_deref(), &record_id, arrival_ts)?;
        }

        Commands::Info => cmd_info(),
    }

    Ok(())
}

fn cmd_info() {
    println!("ddbhistory v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Input format:  dynamodb-stream (Firehose transformation event)");
    println!("Output:        one base64 JSON line per record, same order");
    println!("Statuses:      Ok | ProcessingFailed");
    println!();
    println!("Attribute tags:");
    println!("  S  N  B  BOOL  NULL  L  M  SS  NS  BS");
    println!();
    println!("Normalized fields:");
    println!("  recordId  approximateArrivalTimestamp  eventID  eventName  tableName");
    println!("  ApproximateCreationDateTime  SizeBytes  NewImage  OldImage");
}
