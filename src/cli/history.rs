// src/cli/history.rs - Cooking history table

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::backend::{DishBackend, HistoryPage, HistoryQuery, HistoryRecord};
use crate::infra::config::Config;
use crate::util::format_duration;

pub async fn show_history(
    backend: Arc<dyn DishBackend>,
    config: &Config,
    page: u32,
    search: Option<String>,
    status: Option<String>,
) -> anyhow::Result<()> {
    let mut query = HistoryQuery::new(page, config.history.page_size);
    query.search = search;
    query.status = status;

    let result = backend.history(&query).await?;
    print!("{}", render_history(&result, query.page));
    Ok(())
}

/// e.g. "March 01, 2026 - 18:30"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %d, %Y - %H:%M").to_string()
}

fn ingredient_summary(record: &HistoryRecord) -> String {
    record
        .ingredients
        .iter()
        .map(|i| {
            let name = i
                .ingredient
                .as_ref()
                .map(|n| n.name.as_str())
                .unwrap_or("?");
            format!("{} ({})", name, i.quantity.unwrap_or(0))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_history(page: &HistoryPage, page_number: u32) -> String {
    let mut out = String::new();
    if page.history.is_empty() {
        let _ = writeln!(out, "No cooking history.");
    }
    for record in &page.history {
        let date = record
            .updated_at
            .as_ref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<24} {:<16} {:>6} g {:>9}  {}",
            date,
            record.name,
            record.inputed_quantity.unwrap_or(0),
            format_duration(record.total_cooking_time.unwrap_or(0)),
            record.status,
        );
        let ingredients = ingredient_summary(record);
        if !ingredients.is_empty() {
            let _ = writeln!(out, "    {}", ingredients);
        }
    }
    let _ = writeln!(out, "Page {} of {}", page_number, page.total_pages.max(1));
    out
}
