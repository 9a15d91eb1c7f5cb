use anyhow::{Context, Result, bail};

use feed_fetch::{FetchConfig, Fetcher};
use feed_model::Catalog;
use feed_output::PartitionDate;

use feed_cli::export::{ExportFormat, ExportRequest, export_categories};
use feed_cli::render::{catalog_table, export_table, preview_table};
use feed_cli::session::{FeedSession, categories_json, row_json};

use crate::cli::{ExportArgs, ExportFormatArg, ShowArgs, ShowFormatArg};

/// Rows printed by `show --format table` when no limit is given.
const DEFAULT_PREVIEW_ROWS: usize = 20;

pub fn run_categories(catalog: &Catalog) -> Result<()> {
    println!("{}", catalog_table(catalog));
    Ok(())
}

/// Returns true when every category loaded.
pub fn run_show(catalog: Catalog, args: &ShowArgs) -> Result<bool> {
    let session = open_session(catalog)?;

    if let Some(index) = args.row {
        let [category] = args.categories.as_slice() else {
            bail!("--row takes exactly one category");
        };
        let table = session.load(category)?;
        let record = row_json(&table, index).with_context(|| format!("show {category}"))?;
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(true);
    }

    let outcomes = session.load_many(&args.categories);
    let all_loaded = outcomes.iter().all(|(_, outcome)| outcome.is_ok());

    match args.format {
        ShowFormatArg::Json => {
            let value = categories_json(&outcomes, args.limit)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ShowFormatArg::Table => {
            let limit = args.limit.unwrap_or(DEFAULT_PREVIEW_ROWS);
            for (category, outcome) in &outcomes {
                match outcome {
                    Ok(table) => {
                        println!("{category}: {} rows, {} columns", table.len(), table.width());
                        println!("{}", preview_table(table, limit));
                    }
                    Err(error) => eprintln!("{category}: error: {error:#}"),
                }
            }
        }
    }
    Ok(all_loaded)
}

/// Returns true when every category was written.
pub fn run_export(catalog: Catalog, args: &ExportArgs) -> Result<bool> {
    let session = open_session(catalog)?;
    let request = ExportRequest {
        output_dir: args.output_dir.clone(),
        format: match args.format {
            ExportFormatArg::Parquet => ExportFormat::Parquet,
            ExportFormatArg::Json => ExportFormat::Json,
        },
        date: args.date.map_or_else(PartitionDate::today, PartitionDate::new),
        partitions: args.partitions.clone(),
    };

    let outcomes = export_categories(&session, &args.categories, &request);
    println!("Output: {}", request.output_dir.display());
    println!("{}", export_table(&outcomes));
    Ok(outcomes.iter().all(|(_, outcome)| outcome.is_ok()))
}

fn open_session(catalog: Catalog) -> Result<FeedSession> {
    let fetcher = Fetcher::new(FetchConfig::default()).context("create HTTP client")?;
    Ok(FeedSession::new(catalog, fetcher))
}
