//! `nboard sections`: the catalog with per-section record counts.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde::Serialize;

use noticeboard_core::catalog;
use noticeboard_core::repository::record::RecordRepository;
use noticeboard_types::section::SectionKey;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SectionSummary {
    key: SectionKey,
    label: &'static str,
    records: u64,
    page: bool,
}

pub async fn list_sections(state: &AppState, json: bool) -> Result<()> {
    let mut summaries = Vec::with_capacity(SectionKey::ALL.len());
    for (key, label) in catalog::sections() {
        let records = state.records.count(key).await?;
        let page = tokio::fs::try_exists(state.content.page_path(key))
            .await
            .unwrap_or(false);
        summaries.push(SectionSummary {
            key,
            label,
            records,
            page,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Key").fg(Color::White),
        Cell::new("Label").fg(Color::White),
        Cell::new("Entries").fg(Color::White),
        Cell::new("Page").fg(Color::White),
    ]);

    for summary in &summaries {
        let page = if summary.page {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("missing").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(summary.key).fg(Color::Cyan),
            Cell::new(summary.label),
            Cell::new(summary.records),
            page,
        ]);
    }

    let total: u64 = summaries.iter().map(|s| s.records).sum();
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} entries in {} sections  {}",
        style(total).bold(),
        summaries.len(),
        style(format!("(pages from {})", state.content.dir().display())).dim()
    );
    println!();

    Ok(())
}
