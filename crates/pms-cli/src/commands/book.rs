use clap::Args;
use serde_json::Value;

use pms_core::engine::derive_book_metrics;
use pms_core::performance::volatility::HistoricalVolatility;
use pms_core::synthetic::{generate_book, SyntheticBookInput};

/// Arguments for synthetic book generation
#[derive(Args)]
pub struct BookArgs {
    /// Number of client records to generate
    #[arg(long, default_value = "25")]
    pub clients: u32,

    /// Seed for reproducible generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append derived metrics to each record
    #[arg(long)]
    pub metrics: bool,
}

pub fn run_book(args: BookArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = SyntheticBookInput {
        num_clients: args.clients,
        seed: args.seed,
    };
    let book = generate_book(&input)?;

    if !args.metrics {
        return Ok(serde_json::to_value(book)?);
    }

    let estimator = HistoricalVolatility::default();
    let metrics = derive_book_metrics(&book, &estimator);

    // One flat object per client: record fields first, derived fields after
    let mut rows: Vec<Value> = Vec::with_capacity(book.len());
    for (record, derived) in book.iter().zip(metrics.iter()) {
        let mut row = serde_json::to_value(record)?;
        let derived_value = serde_json::to_value(derived)?;
        if let (Value::Object(row_map), Value::Object(derived_map)) =
            (&mut row, derived_value)
        {
            for (key, val) in derived_map {
                if key != "client_id" {
                    row_map.insert(key, val);
                }
            }
        }
        rows.push(row);
    }

    Ok(Value::Array(rows))
}
