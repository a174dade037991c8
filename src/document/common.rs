//! Common utilities for document rendering.
//!
//! Shared helpers for Typst escaping, Indonesian dates, and output file names.

use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use crate::report::model::ReportRecord;

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("static regex");
}

fn indonesian(date: NaiveDate) -> String {
    let day = date.day();
    let month = MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)];
    let year = date.year();

    format!("{day} {month} {year}")
}

/// Format current date in Indonesian format (e.g., "30 Desember 2025").
pub fn format_indonesian_date() -> String {
    indonesian(Local::now().date_naive())
}

/// Write an ISO date (`2025-12-30`) in Indonesian; other text is returned as typed.
pub fn format_indonesian_date_from(value: &str) -> String {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(indonesian)
        .unwrap_or_else(|_| value.to_string())
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\r', "")
        .replace('\n', r"\n")
}

/// Quote a value as a Typst string literal.
pub fn typst_str(value: &str) -> String {
    format!("\"{}\"", escape_typst_string(value))
}

/// `Rapor_<name>_<semester>` with whitespace runs turned into `_`.
pub fn document_title(record: &ReportRecord) -> String {
    let name = WHITESPACE.replace_all(&record.student.name, "_");
    format!("Rapor_{}_{}", name, record.student.semester.label())
}

/// File name for a capture of `record`, safe for a download header.
pub fn output_filename(record: &ReportRecord, extension: &str) -> String {
    let name = sanitize_filename::sanitize(format!("{}.{}", document_title(record), extension));
    if name.is_empty() {
        format!("rapor.{extension}")
    } else {
        name
    }
}

/// `attachment` disposition for a download. Non-ASCII names are sent as an
/// ASCII `filename` plus a UTF-8 `filename*`.
pub fn attachment_disposition(filename: &str) -> ContentDisposition {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    let mut parameters = vec![DispositionParam::Filename(ascii)];
    if !filename.is_ascii() {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext(String::from("UTF-8")),
            language_tag: None,
            value: filename.as_bytes().to_vec(),
        }));
    }

    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}
