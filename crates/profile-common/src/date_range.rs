//! `job_dates` codec.
//!
//! Experience dates travel as one string, `"<Month> <Year> - <Month> <Year>"`
//! or `"<Month> <Year> - Present"`. Input with zero or several `" - "`
//! delimiters is rejected rather than split at a guess.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::validation::{self, ValidationError};

pub const DELIMITER: &str = " - ";
pub const PRESENT: &str = "Present";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("date range '{0}' has no \" - \" delimiter")]
    MissingDelimiter(String),

    #[error("date range '{0}' has more than one \" - \" delimiter")]
    RepeatedDelimiter(String),

    #[error("'{0}' is not a \"<Month> <Year>\" pair")]
    MalformedSide(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthYear {
    pub month: String,
    pub year: String,
}

impl MonthYear {
    pub fn new(month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            year: year.into(),
        }
    }

    fn parse(side: &str) -> Result<Self, DateRangeError> {
        match side.split_once(' ') {
            Some((month, year)) if !month.is_empty() && !year.is_empty() => {
                Ok(Self::new(month, year))
            }
            _ => Err(DateRangeError::MalformedSide(side.to_string())),
        }
    }

    /// Months since year zero, for ordering. `None` if either token is invalid.
    fn ordinal(&self) -> Option<i32> {
        let month = validation::month_index(&self.month)? as i32;
        let year: i32 = self.year.parse().ok()?;
        Some(year * 12 + month)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeEnd {
    Present,
    Until(MonthYear),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: MonthYear,
    pub to: RangeEnd,
}

impl DateRange {
    /// Checks month names, years (four digits, not after `current_year`) and
    /// that the range does not end before it starts.
    pub fn validate(&self, current_year: i32) -> Result<(), ValidationError> {
        validation::validate_month(&self.from.month)?;
        validation::validate_year(&self.from.year, current_year)?;
        if let RangeEnd::Until(to) = &self.to {
            validation::validate_month(&to.month)?;
            validation::validate_year(&to.year, current_year)?;
            if let (Some(start), Some(end)) = (self.from.ordinal(), to.ordinal()) {
                if end < start {
                    return Err(ValidationError::EndsBeforeStart);
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.to {
            RangeEnd::Present => write!(f, "{}{DELIMITER}{PRESENT}", self.from),
            RangeEnd::Until(to) => write!(f, "{}{DELIMITER}{}", self.from, to),
        }
    }
}

impl FromStr for DateRange {
    type Err = DateRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.matches(DELIMITER).count() {
            0 => return Err(DateRangeError::MissingDelimiter(s.to_string())),
            1 => {}
            _ => return Err(DateRangeError::RepeatedDelimiter(s.to_string())),
        }
        let (from, to) = s
            .split_once(DELIMITER)
            .ok_or_else(|| DateRangeError::MissingDelimiter(s.to_string()))?;

        let from = MonthYear::parse(from)?;
        let to = if to == PRESENT {
            RangeEnd::Present
        } else {
            RangeEnd::Until(MonthYear::parse(to)?)
        };
        Ok(DateRange { from, to })
    }
}

/// Which of the editable date inputs a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    FromMonth,
    FromYear,
    ToMonth,
    ToYear,
}

/// The five date inputs of an experience entry as the user edits them.
/// Empty strings mean "not chosen yet".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateFields {
    pub from_month: String,
    pub from_year: String,
    pub to_month: String,
    pub to_year: String,
    pub to_present: bool,
}

impl DateFields {
    /// Joins the inputs without validating them. `to_present` wins over any
    /// end month/year.
    pub fn encode(&self) -> String {
        let to = if self.to_present {
            PRESENT.to_string()
        } else {
            format!("{} {}", self.to_month, self.to_year)
        };
        format!("{} {}{DELIMITER}{to}", self.from_month, self.from_year)
    }

    pub fn decode(s: &str) -> Result<Self, DateRangeError> {
        s.parse::<DateRange>().map(|range| DateFields::from(&range))
    }

    /// Validates every input, reporting each bad one, and returns the typed range.
    pub fn validate(
        &self,
        current_year: i32,
    ) -> Result<DateRange, Vec<(DatePart, ValidationError)>> {
        let mut errors = Vec::new();

        if let Err(e) = validation::validate_month(&self.from_month) {
            errors.push((DatePart::FromMonth, e));
        }
        if let Err(e) = validation::validate_year(&self.from_year, current_year) {
            errors.push((DatePart::FromYear, e));
        }
        if !self.to_present {
            if let Err(e) = validation::validate_month(&self.to_month) {
                errors.push((DatePart::ToMonth, e));
            }
            if let Err(e) = validation::validate_year(&self.to_year, current_year) {
                errors.push((DatePart::ToYear, e));
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let range = DateRange {
            from: MonthYear::new(&self.from_month, &self.from_year),
            to: if self.to_present {
                RangeEnd::Present
            } else {
                RangeEnd::Until(MonthYear::new(&self.to_month, &self.to_year))
            },
        };
        range
            .validate(current_year)
            .map_err(|e| vec![(DatePart::ToYear, e)])?;
        Ok(range)
    }
}

impl From<&DateRange> for DateFields {
    fn from(range: &DateRange) -> Self {
        let (to_month, to_year, to_present) = match &range.to {
            RangeEnd::Present => (String::new(), String::new(), true),
            RangeEnd::Until(to) => (to.month.clone(), to.year.clone(), false),
        };
        DateFields {
            from_month: range.from.month.clone(),
            from_year: range.from.year.clone(),
            to_month,
            to_year,
            to_present,
        }
    }
}
