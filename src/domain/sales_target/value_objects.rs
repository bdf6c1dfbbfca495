use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// Granularity of a sales target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "target_type", rename_all = "UPPERCASE")]
pub enum TargetType {
    Monthly,
    Quarterly,
    Yearly,
}

impl TargetType {
    /// Parses a wire value, falling back to `Monthly` for anything unknown
    ///
    /// # Example
    /// ```
    /// use indana_erp_api::domain::sales_target::TargetType;
    ///
    /// assert_eq!(TargetType::parse_or_monthly("yearly"), TargetType::Yearly);
    /// assert_eq!(TargetType::parse_or_monthly("WEEKLY"), TargetType::Monthly);
    /// ```
    pub fn parse_or_monthly(raw: &str) -> Self {
        raw.parse().unwrap_or(TargetType::Monthly)
    }
}

impl FromStr for TargetType {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MONTHLY" => Ok(TargetType::Monthly),
            "QUARTERLY" => Ok(TargetType::Quarterly),
            "YEARLY" => Ok(TargetType::Yearly),
            _ => Err(PeriodError::UnknownTargetType(s.to_string())),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Monthly => write!(f, "MONTHLY"),
            TargetType::Quarterly => write!(f, "QUARTERLY"),
            TargetType::Yearly => write!(f, "YEARLY"),
        }
    }
}

/// Errors raised while reading a period string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("'{raw}' is not a valid {expected} period")]
    InvalidFormat { raw: String, expected: TargetType },

    #[error("month {0} is out of range (1-12)")]
    MonthOutOfRange(u32),

    #[error("quarter {0} is out of range (1-4)")]
    QuarterOutOfRange(u32),

    #[error("'{0}' does not look like a target period")]
    UnrecognizedShape(String),

    #[error("unknown target type '{0}'")]
    UnknownTargetType(String),

    #[error("no calendar range for period {0}")]
    NoDateRange(String),

    #[error("year {0} cannot be written as a four-digit period")]
    YearOutOfRange(i32),
}

/// Inclusive calendar range covered by a target period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns true if the date falls on or between both bounds
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Calendar interval a sales target is measured against
///
/// Stored and transmitted as `YYYY-MM`, `YYYY-Qn` or `YYYY`; the string form
/// only exists at the storage and wire boundary.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use indana_erp_api::domain::sales_target::{TargetPeriod, TargetType};
///
/// let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
/// let period = TargetPeriod::for_date(TargetType::Quarterly, date).unwrap();
/// assert_eq!(period.to_string(), "2025-Q2");
///
/// let range = period.date_range().unwrap();
/// assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TargetPeriod {
    Monthly { year: i32, month: u32 },
    Quarterly { year: i32, quarter: u32 },
    Yearly { year: i32 },
}

impl TargetPeriod {
    /// Years representable in a period string
    pub const YEARS: RangeInclusive<i32> = 0..=9999;

    /// Period of the given granularity containing `date`
    ///
    /// Fails for dates whose year does not fit the four-digit form, so
    /// every period built here parses back to itself.
    pub fn for_date(target_type: TargetType, date: NaiveDate) -> Result<Self, PeriodError> {
        let year = date.year();
        if !Self::YEARS.contains(&year) {
            return Err(PeriodError::YearOutOfRange(year));
        }

        let month = date.month();
        Ok(match target_type {
            TargetType::Monthly => TargetPeriod::Monthly { year, month },
            TargetType::Quarterly => TargetPeriod::Quarterly {
                year,
                quarter: (month + 2) / 3,
            },
            TargetType::Yearly => TargetPeriod::Yearly { year },
        })
    }

    /// Parses a period string that must match the declared type
    ///
    /// Out-of-range months and quarters are rejected, as are months that
    /// are not zero-padded to two digits.
    pub fn parse(raw: &str, target_type: TargetType) -> Result<Self, PeriodError> {
        let invalid = || PeriodError::InvalidFormat {
            raw: raw.to_string(),
            expected: target_type,
        };

        match target_type {
            TargetType::Monthly => {
                let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
                let year = parse_year(year).ok_or_else(invalid)?;
                let month = parse_digits(month, 2).ok_or_else(invalid)?;
                if !(1..=12).contains(&month) {
                    return Err(PeriodError::MonthOutOfRange(month));
                }
                Ok(TargetPeriod::Monthly { year, month })
            }
            TargetType::Quarterly => {
                let (year, quarter) = raw.split_once("-Q").ok_or_else(invalid)?;
                let year = parse_year(year).ok_or_else(invalid)?;
                let quarter = parse_digits(quarter, 1).ok_or_else(invalid)?;
                if !(1..=4).contains(&quarter) {
                    return Err(PeriodError::QuarterOutOfRange(quarter));
                }
                Ok(TargetPeriod::Quarterly { year, quarter })
            }
            TargetType::Yearly => {
                let year = parse_year(raw).ok_or_else(invalid)?;
                Ok(TargetPeriod::Yearly { year })
            }
        }
    }

    /// Granularity of this period
    pub fn target_type(&self) -> TargetType {
        match self {
            TargetPeriod::Monthly { .. } => TargetType::Monthly,
            TargetPeriod::Quarterly { .. } => TargetType::Quarterly,
            TargetPeriod::Yearly { .. } => TargetType::Yearly,
        }
    }

    /// Inclusive first and last day of the period
    ///
    /// Returns `None` for hand-built values with an impossible month or
    /// quarter; parsed values always have a range.
    pub fn date_range(&self) -> Option<DateRange> {
        let (start, end) = match *self {
            TargetPeriod::Monthly { year, month } => {
                (NaiveDate::from_ymd_opt(year, month, 1)?, last_day_of(year, month)?)
            }
            TargetPeriod::Quarterly { year, quarter } => {
                if !(1..=4).contains(&quarter) {
                    return None;
                }
                let first_month = (quarter - 1) * 3 + 1;
                (
                    NaiveDate::from_ymd_opt(year, first_month, 1)?,
                    last_day_of(year, first_month + 2)?,
                )
            }
            TargetPeriod::Yearly { year } => (
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year, 12, 31)?,
            ),
        };

        Some(DateRange { start, end })
    }
}

impl fmt::Display for TargetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPeriod::Monthly { year, month } => write!(f, "{:04}-{:02}", year, month),
            TargetPeriod::Quarterly { year, quarter } => write!(f, "{:04}-Q{}", year, quarter),
            TargetPeriod::Yearly { year } => write!(f, "{:04}", year),
        }
    }
}

/// Infers the granularity from the shape of the string
impl FromStr for TargetPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let target_type = if s.contains("-Q") {
            TargetType::Quarterly
        } else if s.contains('-') {
            TargetType::Monthly
        } else if s.len() == 4 {
            TargetType::Yearly
        } else {
            return Err(PeriodError::UnrecognizedShape(s.to_string()));
        };

        TargetPeriod::parse(s, target_type)
    }
}

impl From<TargetPeriod> for String {
    fn from(period: TargetPeriod) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for TargetPeriod {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn parse_year(raw: &str) -> Option<i32> {
    parse_digits(raw, 4).map(|year| year as i32)
}

fn parse_digits(raw: &str, width: usize) -> Option<u32> {
    if raw.len() != width || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn last_day_of(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
