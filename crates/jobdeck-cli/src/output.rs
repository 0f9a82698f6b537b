//! Terminal rendering for listings.

use jobdeck_core::Record;
use jobdeck_engine::ListingSnapshot;

/// `#id Title at Company`, falling back to whatever fields are present.
pub fn headline(record: &Record) -> String {
    let title = record.title.as_deref().unwrap_or("(untitled)");
    match record.company.as_deref() {
        Some(company) => format!("#{} {} at {}", record.id, title, company),
        None => format!("#{} {}", record.id, title),
    }
}

fn details(record: &Record) -> String {
    [
        record.location.as_deref(),
        record.salary.as_deref(),
        record.experience.as_deref(),
        record.job_type.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" | ")
}

fn print_record(record: &Record, saved: bool) {
    println!("{} {}", if saved { "*" } else { " " }, headline(record));
    let details = details(record);
    if !details.is_empty() {
        println!("    {}", details);
    }
    if let Some(posted) = record.posted_on() {
        println!("    posted {}", posted.format("%Y-%m-%d"));
    }
}

pub fn print_snapshot(snapshot: &ListingSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    for row in &snapshot.rows {
        print_record(&row.record, row.saved);
    }
    println!(
        "{} of {} loaded listings match{}",
        snapshot.result_count,
        snapshot.total_loaded,
        if snapshot.has_more { "" } else { " (no more pages)" }
    );
    Ok(())
}

pub fn print_saved(records: &[Record], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No saved listings");
        return Ok(());
    }
    for record in records {
        print_record(record, true);
        if let Some(uri) = record.dial_uri() {
            println!("    call {}", uri);
        }
        if let Some(url) = record.whatsapp_url() {
            println!("    whatsapp {}", url);
        }
    }
    Ok(())
}
