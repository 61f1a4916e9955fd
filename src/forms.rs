//! Parsing helpers shared by the admin form handlers.

use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    Invalid,
    Negative,
}

/// Trimmed value, or `None` when blank.
pub fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// HTML checkboxes submit `on` when ticked and nothing otherwise.
pub fn checkbox(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("on" | "true"))
}

/// Largest amount a form may submit. Sums of stored amounts stay finite.
pub const MAX_AMOUNT: f64 = 1e12;

/// Parses a money amount. Blank input is zero.
pub fn parse_amount(raw: &str) -> Result<f64, NumberError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let value = raw.parse::<f64>().map_err(|_| NumberError::Invalid)?;
    if !value.is_finite() || value > MAX_AMOUNT {
        return Err(NumberError::Invalid);
    }
    if value < 0.0 {
        return Err(NumberError::Negative);
    }
    Ok(value)
}

/// Parses a non-negative count. Blank input is zero.
pub fn parse_count(raw: &str) -> Result<i32, NumberError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let value = raw.parse::<i32>().map_err(|_| NumberError::Invalid)?;
    if value < 0 {
        return Err(NumberError::Negative);
    }
    Ok(value)
}

/// Parses the value of a `datetime-local` input (or its space-separated form),
/// with or without seconds, as UTC. Blank input is `Ok(None)`.
pub fn parse_datetime(raw: &str) -> Result<Option<OffsetDateTime>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let formats = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ];
    formats
        .iter()
        .find_map(|f| PrimitiveDateTime::parse(raw, *f).ok())
        .map(|dt| Some(dt.assume_utc()))
        .ok_or_else(|| format!("Cannot parse datetime: {raw}"))
}

/// Renders a timestamp for a `datetime-local` input.
pub fn input_datetime(value: Option<OffsetDateTime>) -> String {
    let fmt = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    value
        .and_then(|v| v.format(fmt).ok())
        .unwrap_or_default()
}

/// Accepts only local absolute paths so a `next` parameter cannot leave the site.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}
