use std::fmt::Write as _;

use crate::domain::entities::metrics::MetricsReport;
use crate::domain::entities::query::Page;
use crate::domain::entities::record::Record;
use crate::domain::entities::resource::{Column, ColumnFormat, ResourceKind};
use crate::domain::markup::strip_markup;
use crate::domain::pagination::PageInfo;
use crate::ui::state::app_state::ViewStatus;
use crate::ui::state::creator_view::CreatorView;
use crate::ui::state::product_view::ProductView;

pub const MISSING: &str = "N/A";
const MAX_CELL_WIDTH: usize = 40;

pub fn cell_text(record: &Record, column: &Column) -> String {
    let text = match record.text(column.field) {
        Some(value) if !value.trim().is_empty() => value,
        _ => return MISSING.to_string(),
    };

    let text = match column.format {
        ColumnFormat::RichText => strip_markup(&text).replace('\n', " "),
        ColumnFormat::Text | ColumnFormat::Identifier => text,
    };
    truncate(&text, MAX_CELL_WIDTH)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

pub fn render_table(columns: &[Column], records: &[Record], first_index: u64) -> String {
    let mut header = vec!["#".to_string()];
    header.extend(columns.iter().map(|column| column.header.to_string()));

    let rows: Vec<Vec<String>> = records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let mut row = vec![(first_index + idx as u64).to_string()];
            row.extend(columns.iter().map(|column| cell_text(record, column)));
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn showing_line(info: &PageInfo) -> String {
    format!(
        "Showing {} to {} of {}",
        info.first_item, info.last_item, info.total
    )
}

fn page_footer(info: &PageInfo) -> String {
    format!(
        "{} (page {} of {})",
        showing_line(info),
        info.current_page,
        info.total_pages.max(1)
    )
}

fn status_banner(status: &ViewStatus, label: &str) -> Option<String> {
    match status {
        ViewStatus::Loading => Some(format!("Loading {label}...\n")),
        ViewStatus::Failed { message } => Some(format!("{message}\n")),
        ViewStatus::Idle | ViewStatus::Ready => None,
    }
}

pub fn render_products(view: &ProductView) -> String {
    if let Some(banner) = status_banner(view.status(), "campaign products") {
        return banner;
    }

    let Some(page) = view.page() else {
        return "No campaign products found\n".to_string();
    };
    if page.items.is_empty() {
        return "No campaign products found\n".to_string();
    }

    let info = view.page_info();
    let mut out = render_table(
        ResourceKind::Products.columns(),
        &page.items,
        info.first_item,
    );
    out.push_str(&page_footer(&info));
    out.push('\n');
    out
}

pub fn render_creators(view: &CreatorView) -> String {
    if let Some(banner) = status_banner(view.status(), "creators") {
        return banner;
    }

    let visible = view.visible();
    if visible.is_empty() {
        return if view.query().has_active_filters() {
            "No creators match your search\n".to_string()
        } else {
            "No creators found\n".to_string()
        };
    }

    let info = view.page_info();
    let mut out = render_table(ResourceKind::Creators.columns(), &visible, info.first_item);
    out.push_str(&page_footer(&info));
    if view.query().has_active_filters() {
        let _ = write!(out, " (filtered from {} creators)", view.reported_total());
    }
    out.push('\n');
    out
}

pub fn render_campaigns(page: &Page) -> String {
    if page.items.is_empty() {
        return "No campaigns found\n".to_string();
    }

    let mut out = render_table(ResourceKind::Campaigns.columns(), &page.items, 1);
    let _ = writeln!(out, "{} campaigns", page.total);
    out
}

fn amount(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |value| format!("{value:.decimals$}"))
}

fn growth(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |value| format!("{value:+.1}%"))
}

fn change(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |value| format!("{value:+.decimals$}"))
}

fn text_or_missing(value: Option<&str>) -> &str {
    value.filter(|text| !text.trim().is_empty()).unwrap_or(MISSING)
}

pub fn render_metrics(report: &MetricsReport) -> String {
    let Some(latest) = report.latest() else {
        return "No metrics available\n".to_string();
    };

    let mut out = String::new();
    let period = &report.period;
    if period.start_date.is_some() || period.end_date.is_some() {
        let days = period
            .total_days
            .map_or_else(|| MISSING.to_string(), |days| days.to_string());
        let _ = writeln!(
            out,
            "Period: {} to {} ({days} days)",
            text_or_missing(period.start_date.as_deref()),
            text_or_missing(period.end_date.as_deref()),
        );
    }
    let _ = writeln!(out, "As of {}", text_or_missing(latest.metric_date.as_deref()));
    let _ = writeln!(
        out,
        "Total Creators:        {} ({})",
        amount(latest.total_creators, 0),
        growth(latest.creators_growth)
    );
    let _ = writeln!(
        out,
        "Products Substituted:  {} ({})",
        amount(latest.total_products_substituted, 0),
        growth(latest.products_substituted_growth)
    );
    let gmv = latest
        .gmv_generated
        .map_or_else(|| MISSING.to_string(), |gmv| format!("${gmv:.2}"));
    let _ = writeln!(
        out,
        "GMV Generated:         {gmv} ({})",
        growth(latest.gmv_growth)
    );
    let _ = writeln!(
        out,
        "Avg Products/Creator:  {}",
        amount(latest.avg_products_per_creator, 1)
    );

    if let Some(summary) = &report.summary {
        out.push_str("\nPeriod Summary\n");
        let _ = writeln!(
            out,
            "Creators Change:         {}",
            change(summary.total_creators_change, 0)
        );
        let _ = writeln!(
            out,
            "Products Change:         {}",
            change(summary.total_products_substituted_change, 0)
        );
        let _ = writeln!(
            out,
            "System Products Change:  {}",
            change(summary.total_products_in_system_change, 0)
        );
        let _ = writeln!(
            out,
            "GMV Change:              {}",
            change(summary.gmv_change, 2)
        );
    }
    out
}
