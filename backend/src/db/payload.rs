//! Decoding of rating payloads that may contain non-standard numbers.
//!
//! Upstream producers serialise missing ratings as bare `NaN`, `Infinity` or
//! `-Infinity` tokens, which are not valid JSON. [`sanitize_json`] rewrites
//! those tokens to `null` outside string literals, and [`normalize_rating`]
//! turns each decoded value into a finite number or `None`.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use super::repository::{ErrorContext, SourceError, SourceResult};
use crate::models::{RatingRecord, TeamId};

const SENTINELS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Replace bare non-finite number tokens with `null`.
pub fn sanitize_json(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = raw;

    while let Some(c) = rest.chars().next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            rest = &rest[1..];
            continue;
        }

        if let Some(token) = SENTINELS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Normalise one decoded rating value.
///
/// Finite numbers pass through, numeric strings are parsed, and everything
/// else (null, sentinel strings, objects) is treated as absent.
pub fn normalize_rating(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    date: String,
    team: String,
    #[serde(default)]
    rating: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Wrapped { data: Vec<RawRecord> },
    Bare(Vec<RawRecord>),
}

/// Parse a series payload (`{"data": [...]}` or a bare array) into records.
///
/// A payload that is not JSON at all is a [`SourceError::Parse`]. Individual
/// malformed ratings become `None`; records with an unreadable date are
/// dropped.
pub fn parse_series_payload(raw: &str) -> SourceResult<Vec<RatingRecord>> {
    let cleaned = sanitize_json(raw);
    let payload: RawPayload = serde_json::from_str(&cleaned)
        .map_err(|e| SourceError::from(e).with_operation("parse_series_payload"))?;

    let raw_records = match payload {
        RawPayload::Wrapped { data } => data,
        RawPayload::Bare(data) => data,
    };

    let mut records = Vec::with_capacity(raw_records.len());
    for raw in raw_records {
        match parse_date(&raw.date) {
            Some(date) => records.push(RatingRecord {
                date,
                team: TeamId::new(raw.team),
                rating: normalize_rating(&raw.rating),
            }),
            None => log::warn!("Skipping record for '{}' with unreadable date '{}'", raw.team, raw.date),
        }
    }
    Ok(records)
}

/// Parse `YYYY-MM-DD`, ignoring any time suffix.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Parse a date query parameter, naming the parameter on failure.
pub fn parse_date_param(name: &str, raw: &str) -> SourceResult<NaiveDate> {
    parse_date(raw).ok_or_else(|| {
        SourceError::parse_with_context(
            format!("{} must be a YYYY-MM-DD date", name),
            ErrorContext::new("parse_date_param").with_details(raw.to_string()),
        )
    })
}
