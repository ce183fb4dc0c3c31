//! Operator record commands: list, show, add, set-details, replace, delete.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use noticeboard_core::catalog;
use noticeboard_core::repository::record::RecordRepository;
use noticeboard_types::record::{Record, RecordId, details_from_input};
use noticeboard_types::section::SectionKey;

use crate::state::AppState;

const BODY_PREVIEW_CHARS: usize = 60;

pub async fn list_records(state: &AppState, section: SectionKey, json: bool) -> Result<()> {
    let records = state.records.list(section).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let label = catalog::display_name(section);
    if records.is_empty() {
        println!();
        println!(
            "  {} {} has no entries. Add one with: {}",
            style("i").blue().bold(),
            style(label).cyan(),
            style(format!("nboard records add {section} \"...\"")).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Body").fg(Color::White),
        Cell::new("Details").fg(Color::White),
    ]);

    for record in &records {
        let details = if record.has_details() {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("-").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(record.id).fg(Color::Cyan),
            Cell::new(record.created_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
            Cell::new(preview(&record.body)),
            details,
        ]);
    }

    println!();
    println!("  {}", style(label).cyan().bold());
    println!("{table}");
    println!();
    println!(
        "  {} entr{}",
        style(records.len()).bold(),
        if records.len() == 1 { "y" } else { "ies" }
    );
    println!();

    Ok(())
}

pub async fn show_record(state: &AppState, id: RecordId, json: bool) -> Result<()> {
    let record = fetch(state, id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(format!("#{}", record.id)).cyan().bold(),
        style(catalog::display_name(record.section)).dim()
    );
    println!(
        "  {}  {}",
        style("Created:").bold(),
        style(record.created_at.to_rfc3339()).dim()
    );
    println!();
    for line in record.body.lines() {
        println!("  {line}");
    }
    println!();
    println!("  {}", style("── Details ──").dim());
    match &record.details {
        Some(details) => {
            for line in details.lines() {
                println!("  {line}");
            }
        }
        None => println!("  {}", style("(none)").dim()),
    }
    println!();

    Ok(())
}

pub async fn add_record(
    state: &AppState,
    section: SectionKey,
    body: String,
    details: Option<String>,
    json: bool,
) -> Result<()> {
    let id = state
        .records
        .append(section, &body, details.as_deref())
        .await?;
    tracing::info!(record_id = %id, %section, "record added from cli");

    if json {
        let out = serde_json::json!({ "id": id, "section": section });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "  {} Entry {} added to {}",
            style("✓").green().bold(),
            style(format!("#{id}")).cyan(),
            catalog::display_name(section)
        );
        println!();
    }
    Ok(())
}

pub async fn set_details(state: &AppState, id: RecordId, input: String, json: bool) -> Result<()> {
    fetch(state, id).await?;
    let details = details_from_input(&input);
    state.records.update_details(id, details.as_deref()).await?;
    tracing::info!(record_id = %id, cleared = details.is_none(), "details updated from cli");

    if json {
        let out = serde_json::json!({ "id": id, "details": details });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let verb = if details.is_some() { "updated" } else { "removed" };
        println!();
        println!(
            "  {} Details of {} {verb}",
            style("✓").green().bold(),
            style(format!("#{id}")).cyan()
        );
        println!();
    }
    Ok(())
}

pub async fn replace_record(
    state: &AppState,
    id: RecordId,
    body: String,
    details: Option<String>,
    json: bool,
) -> Result<()> {
    fetch(state, id).await?;
    state
        .records
        .replace(id, &body, details.as_deref())
        .await?;
    tracing::info!(record_id = %id, "record replaced from cli");

    let record = fetch(state, id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!();
        println!(
            "  {} Entry {} replaced",
            style("✓").green().bold(),
            style(format!("#{id}")).cyan()
        );
        println!();
    }
    Ok(())
}

pub async fn delete_record(state: &AppState, id: RecordId, json: bool) -> Result<()> {
    let record = fetch(state, id).await?;
    state.records.delete(id).await?;
    tracing::info!(record_id = %id, section = %record.section, "record deleted from cli");

    if json {
        let out = serde_json::json!({ "deleted": id });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "  {} Entry {} deleted from {}",
            style("✓").green().bold(),
            style(format!("#{id}")).cyan(),
            catalog::display_name(record.section)
        );
        println!();
    }
    Ok(())
}

async fn fetch(state: &AppState, id: RecordId) -> Result<Record> {
    match state.records.get(id).await? {
        Some(record) => Ok(record),
        None => bail!("entry #{id} not found"),
    }
}

/// First line of `body`, cut to a table-friendly width.
fn preview(body: &str) -> String {
    let first_line = body.lines().next().unwrap_or_default();
    if first_line.chars().count() > BODY_PREVIEW_CHARS {
        let cut: String = first_line.chars().take(BODY_PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}
