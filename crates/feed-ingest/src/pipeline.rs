//! End-to-end ingestion: fetch, decode, resolve, normalize, materialize.

use feed_fetch::{Fetch, RawPayload};
use feed_model::{ResourceDescriptor, Table};

use crate::csv::{HeaderLayout, materialize, resolve};
use crate::decode::decode_payload;
use crate::error::{IngestError, Result};

/// Fetches and ingests one resource.
///
/// Each call performs a fresh fetch; callers that want to reuse a result
/// should hold it in a [`Snapshot`](crate::Snapshot).
pub fn load_table<F: Fetch + ?Sized>(fetcher: &F, descriptor: &ResourceDescriptor) -> Result<Table> {
    let span = tracing::info_span!("ingest", resource = %descriptor.name);
    let _guard = span.enter();

    let payload = fetcher.fetch(descriptor)?;
    ingest_payload(descriptor, &payload)
}

/// Ingests bytes that were already fetched.
pub fn ingest_payload(descriptor: &ResourceDescriptor, payload: &RawPayload) -> Result<Table> {
    let text = decode_payload(payload)?;
    ingest_text(descriptor, &text)
}

/// Ingests already decoded text using the descriptor's parsing hints.
pub fn ingest_text(descriptor: &ResourceDescriptor, text: &str) -> Result<Table> {
    let schema = resolve(text, &descriptor.delimiters, HeaderLayout::from(descriptor)).map_err(
        |source| IngestError::Schema {
            resource: descriptor.name.clone(),
            source,
        },
    )?;

    let table = materialize(text, &schema).map_err(|source| IngestError::Materialize {
        resource: descriptor.name.clone(),
        source,
    })?;

    let stats = table.stats();
    tracing::info!(
        resource = %descriptor.name,
        delimiter = %schema.delimiter,
        rows = table.len(),
        columns = table.width(),
        skipped_lines = stats.skipped_lines,
        dropped_rows = stats.dropped_rows,
        dropped_columns = stats.dropped_columns,
        "Ingested feed"
    );
    Ok(table)
}
