use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::domain::entities::record::Record;
use crate::domain::entities::resource::{Column, ColumnFormat, ResourceKind};
use crate::domain::markup::strip_markup;

pub const INDEX_HEADER: &str = "No";

pub fn format_cell(record: &Record, column: &Column) -> String {
    let Some(value) = record.text(column.field) else {
        return String::new();
    };

    match column.format {
        ColumnFormat::Text => value,
        ColumnFormat::RichText => strip_markup(&value),
        ColumnFormat::Identifier if value.is_empty() => value,
        // Spreadsheets keep ="..." as text instead of 1.23E+18.
        ColumnFormat::Identifier => format!("=\"{}\"", value.replace('"', "\"\"")),
    }
}

pub fn serialize_records(columns: &[Column], records: &[Record]) -> csv::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push(INDEX_HEADER);
    header.extend(columns.iter().map(|column| column.header));
    writer.write_record(&header)?;

    for (row_idx, record) in records.iter().enumerate() {
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push((row_idx + 1).to_string());
        row.extend(columns.iter().map(|column| format_cell(record, column)));
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

pub fn export_file_name(kind: ResourceKind, filtered: bool, date: NaiveDate) -> String {
    let scope = if filtered { "filtered" } else { "all" };
    format!(
        "{}_{scope}_{}.csv",
        kind.export_prefix(),
        date.format("%Y-%m-%d")
    )
}

pub fn write_export_file(dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export dir: {}", dir.display()))?;

    let final_path = dir.join(file_name);
    let partial_path = dir.join(format!(".{file_name}.partial"));

    if let Err(err) = fs::write(&partial_path, contents) {
        let _ = fs::remove_file(&partial_path);
        return Err(err).with_context(|| {
            format!("failed to write export: {}", partial_path.display())
        });
    }

    fs::rename(&partial_path, &final_path)
        .with_context(|| format!("failed to finalize export: {}", final_path.display()))?;

    Ok(final_path)
}
