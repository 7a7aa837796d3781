//! `ddbhistory transform`: run one Firehose transformation invocation.
//!
//! Reads a transformation event (`{"records":[...]}`), transforms it on a
//! blocking worker and writes the response. With `--timeout-ms` the result
//! is discarded once the budget elapses and the command fails instead of
//! writing a partial response.

use anyhow::{anyhow, Context, Result};
use ddbhistory_batch::{
    BatchTransformer, SummaryReporter, TransformationEvent, TransformerConfig,
};
use ddbhistory_core::{BatchError, BatchSummary, RecordDecoder};
use ddbhistory_dynamodb::DynamoStreamDecoder;
use ddbhistory_observability::TransformMetrics;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub struct Options {
    pub input: String,
    pub output: String,
    pub timeout_ms: Option<u64>,
    pub pretty: bool,
}

pub async fn run(opts: Options, config: TransformerConfig) -> Result<()> {
    let body = read_input(&opts.input)?;

    let decoder = Arc::new(DynamoStreamDecoder::new());
    let source_format = decoder.source_format();
    let reporter = SummaryReporter::new(config.log_samples);
    let transformer = BatchTransformer::with_config(decoder, config)?;

    let started = Instant::now();
    let budget = opts.timeout_ms.map(Duration::from_millis);
    let (response, summary) = execute(transformer, reporter, body, opts.pretty, budget).await?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let metrics = TransformMetrics::global();
    metrics.record_summary(&summary, source_format);
    metrics.record_latency(elapsed_ms, source_format);
    info!(elapsed_ms, records = summary.total, "transform finished");

    write_output(&opts.output, &response)
}

/// Run the batch on a blocking worker. When `budget` elapses the worker is
/// told to stop, its result is dropped and the invocation fails.
async fn execute(
    transformer: BatchTransformer,
    reporter: SummaryReporter,
    body: Vec<u8>,
    pretty: bool,
    budget: Option<Duration>,
) -> Result<(Vec<u8>, BatchSummary)> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    let mut job = tokio::task::spawn_blocking(move || {
        transform_body(&transformer, &reporter, &body, pretty, &flag)
    });

    let Some(budget) = budget else {
        return Ok(job.await.context("transformation worker panicked")??);
    };
    match tokio::time::timeout(budget, &mut job).await {
        Ok(joined) => Ok(joined.context("transformation worker panicked")??),
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            warn!(
                budget_ms = budget.as_millis() as u64,
                "invocation budget exceeded, discarding batch"
            );
            // the worker stops at its next record boundary
            let _ = job.await;
            Err(anyhow!(
                "transformation exceeded the {}ms budget; no response written",
                budget.as_millis()
            ))
        }
    }
}

/// Parse, transform and serialize one event body.
fn transform_body(
    transformer: &BatchTransformer,
    reporter: &SummaryReporter,
    body: &[u8],
    pretty: bool,
    cancel: &AtomicBool,
) -> Result<(Vec<u8>, BatchSummary), BatchError> {
    let event: TransformationEvent =
        serde_json::from_slice(body).map_err(BatchError::MalformedRequest)?;
    let output = transformer.transform_cancellable(&event.records, cancel)?;
    let summary = reporter.report(&output);
    let response = output.into_response();
    let bytes = if pretty {
        serde_json::to_vec_pretty(&response)
    } else {
        serde_json::to_vec(&response)
    }
    .map_err(BatchError::Serialization)?;
    Ok((bytes, summary))
}

fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("read event from stdin")?;
        Ok(buf)
    } else {
        std::fs::read(input).with_context(|| format!("read event file '{}'", input))
    }
}

fn write_output(output: &str, response: &[u8]) -> Result<()> {
    if output == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(response)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
        Ok(())
    } else {
        std::fs::write(output, response)
            .with_context(|| format!("write response file '{}'", output))
    }
}
