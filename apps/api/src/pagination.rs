use crate::errors::AppError;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
}

impl PageWindow {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Parses `page`/`limit` query values. Absent or blank values take defaults,
/// numbers are clamped (`page >= 1`, `1 <= limit <= 50`), anything else is a
/// validation error. A page whose row offset does not fit in an `i64` is
/// rejected as well.
pub fn parse_page_window(page: Option<&str>, limit: Option<&str>) -> Result<PageWindow, AppError> {
    let page = parse_integer("page", page)?.unwrap_or(1).max(1);
    let limit = parse_integer("limit", limit)?
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_LIMIT);
    if (page - 1).checked_mul(limit).is_none() {
        return Err(AppError::Validation("page is too large".to_string()));
    }
    Ok(PageWindow { page, limit })
}

/// Parses an optional integer query parameter; blank means absent.
pub fn parse_integer(name: &str, raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{name} must be an integer"))),
    }
}
