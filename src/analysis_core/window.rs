//! Inclusive date window for lead filtering

use chrono::NaiveDate;

#[derive(Debug)]
pub enum WindowError {
    InvertedRange { date_from: i64, date_to: i64 },
    InvalidDate(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::InvertedRange { date_from, date_to } => write!(
                f,
                "Inverted date range: from {} is after to {}",
                date_from, date_to
            ),
            WindowError::InvalidDate(d) => write!(f, "Invalid date: {}", d),
        }
    }
}

impl std::error::Error for WindowError {}

/// Inclusive `[date_from, date_to]` window over lead creation timestamps
///
/// Bounds are unix seconds; an absent bound is unconstrained on that side.
/// Construction rejects inverted ranges - they are never silently corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub date_from: Option<i64>,
    pub date_to: Option<i64>,
}

impl DateWindow {
    pub fn new(date_from: Option<i64>, date_to: Option<i64>) -> Result<Self, WindowError> {
        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                return Err(WindowError::InvertedRange {
                    date_from: from,
                    date_to: to,
                });
            }
        }
        Ok(Self { date_from, date_to })
    }

    pub fn unbounded() -> Self {
        Self {
            date_from: None,
            date_to: None,
        }
    }

    /// Expand calendar dates to full-day boundaries (00:00:00 / 23:59:59 UTC)
    pub fn from_dates(date_from: NaiveDate, date_to: NaiveDate) -> Result<Self, WindowError> {
        let from = date_from
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| WindowError::InvalidDate(date_from.to_string()))?
            .and_utc()
            .timestamp();
        let to = date_to
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| WindowError::InvalidDate(date_to.to_string()))?
            .and_utc()
            .timestamp();
        Self::new(Some(from), Some(to))
    }

    pub fn has_filter(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Check whether a timestamp falls within the window, bounds inclusive
    pub fn contains(&self, timestamp: i64) -> bool {
        if let Some(from) = self.date_from {
            if timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if timestamp > to {
                return false;
            }
        }
        true
    }
}
