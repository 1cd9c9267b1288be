pub mod application;
pub mod bookmark;
pub mod job;
pub mod user;

use crate::errors::AppError;

/// A closed set of upper-case tokens stored as TEXT (work modes, job types,
/// experience levels, application statuses).
pub trait Vocabulary: Sized + Copy + 'static {
    /// Field name used in validation messages.
    const FIELD: &'static str;

    fn all() -> &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Case-insensitive parse; rejects unknown tokens with a message naming
    /// the allowed values.
    fn parse(raw: &str) -> Result<Self, AppError> {
        let wanted = raw.trim().to_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::all().iter().map(|v| v.as_str()).collect();
                AppError::Validation(format!(
                    "Invalid {}. Allowed: {}",
                    Self::FIELD,
                    allowed.join(", ")
                ))
            })
    }
}
