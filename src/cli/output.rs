//! Output formatting for CLI

use crate::models::DatasetRecord;

/// Format one ingested record for display.
pub fn format_ingest_result(record: &DatasetRecord) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n✅ Ingested dataset #{}\n", record.id));
    output.push_str(&format!("  Stored as: {}\n", record.blob));
    output.push_str(&format!(
        "  Uploaded:  {}\n",
        record.created_at.format("%Y-%m-%d %H:%M:%S")
    ));

    match &record.summary {
        Some(summary) => {
            output.push_str(&format!("  Rows:      {}\n", summary.total_count));
            output.push_str(&format!(
                "  Averages:  Flowrate {} | Pressure {} | Temperature {}\n",
                summary.averages.flowrate, summary.averages.pressure, summary.averages.temperature
            ));
            let types: Vec<String> = summary
                .type_distribution
                .iter()
                .map(|(name, count)| format!("{}:{}", name, count))
                .collect();
            output.push_str(&format!("  Types:     {}\n", types.join(", ")));
        }
        None => {
            output.push_str("  ⚠️  No summary: required columns missing\n");
        }
    }
    output
}

/// Format the stored dataset list, most recent first.
pub fn format_dataset_list(records: &[DatasetRecord]) -> String {
    if records.is_empty() {
        return "No datasets stored.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{} dataset(s):\n", records.len()));
    for record in records {
        let status = if record.summary.is_some() {
            "summarized"
        } else {
            "no summary"
        };
        output.push_str(&format!(
            "  #{:<4} {}  [{}]\n",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            status
        ));
    }
    output
}
