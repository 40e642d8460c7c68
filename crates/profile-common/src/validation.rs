use thiserror::Error;

pub const SUMMARY_MAX_LEN: usize = 280;
pub const NAME_MAX_LEN: usize = 50;
pub const SKILL_MAX_LEN: usize = 50;
pub const TITLE_MAX_LEN: usize = 100;
pub const COMPANY_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Earliest year accepted in an experience date range.
pub const MIN_YEAR: i32 = 1950;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const TEXT_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', '\'', '"', '-', '(', ')', '&', ':', ';', '/', '%', '+', '#', '@', '$',
    '*', '\u{2019}',
];

const NAME_PUNCTUATION: &[char] = &[' ', '-', '\''];

const SKILL_PUNCTUATION: &[char] = &[' ', '+', '#', '.', '-', '/'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("this field is required")]
    Required,

    #[error("must be at most {0} characters")]
    TooLong(usize),

    #[error("contains characters that are not allowed: {0}")]
    InvalidCharacters(String),

    #[error("'{0}' is not a month")]
    UnknownMonth(String),

    #[error("'{0}' is not a four-digit year")]
    InvalidYear(String),

    #[error("year {0} is in the future")]
    FutureYear(String),

    #[error("the date range ends before it starts")]
    EndsBeforeStart,

    #[error("stored dates could not be read: {0}")]
    MalformedDates(String),

    #[error("'{0}' is not a known location")]
    UnknownLocation(String),
}

/// Position (0-based) of a full English month name.
pub fn month_index(month: &str) -> Option<usize> {
    MONTHS.iter().position(|m| *m == month)
}

pub fn validate_month(month: &str) -> Result<(), ValidationError> {
    if month.is_empty() {
        return Err(ValidationError::Required);
    }
    month_index(month)
        .map(|_| ())
        .ok_or_else(|| ValidationError::UnknownMonth(month.to_string()))
}

pub fn validate_year(year: &str, current_year: i32) -> Result<(), ValidationError> {
    if year.is_empty() {
        return Err(ValidationError::Required);
    }
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidYear(year.to_string()));
    }
    let value: i32 = year
        .parse()
        .map_err(|_| ValidationError::InvalidYear(year.to_string()))?;
    if value < MIN_YEAR {
        return Err(ValidationError::InvalidYear(year.to_string()));
    }
    if value > current_year {
        return Err(ValidationError::FutureYear(year.to_string()));
    }
    Ok(())
}

/// A summary may be blank; otherwise letters, digits, whitespace and
/// ordinary punctuation only.
pub fn validate_summary(summary: &str) -> Result<(), ValidationError> {
    check_length(summary, SUMMARY_MAX_LEN)?;
    check_chars(summary, |c| {
        c.is_alphanumeric() || c.is_whitespace() || TEXT_PUNCTUATION.contains(&c)
    })
}

/// First/last names: letters plus space, hyphen and apostrophe.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    require(name)?;
    check_length(name, NAME_MAX_LEN)?;
    check_chars(name, |c| c.is_alphabetic() || NAME_PUNCTUATION.contains(&c))
}

/// Required free text (company, job title, description, desired title).
pub fn validate_text(text: &str, max_len: usize) -> Result<(), ValidationError> {
    require(text)?;
    check_length(text, max_len)?;
    check_chars(text, |c| {
        c.is_alphanumeric() || c.is_whitespace() || TEXT_PUNCTUATION.contains(&c)
    })
}

/// Skill names as typed by users, e.g. `C++`, `C#`, `Node.js`.
pub fn validate_skill_name(name: &str) -> Result<(), ValidationError> {
    require(name)?;
    check_length(name, SKILL_MAX_LEN)?;
    check_chars(name, |c| c.is_alphanumeric() || SKILL_PUNCTUATION.contains(&c))
}

fn require(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required)
    } else {
        Ok(())
    }
}

fn check_length(value: &str, max_len: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max_len {
        Err(ValidationError::TooLong(max_len))
    } else {
        Ok(())
    }
}

fn check_chars(value: &str, allowed: impl Fn(char) -> bool) -> Result<(), ValidationError> {
    let mut rejected: Vec<char> = value.chars().filter(|c| !allowed(*c)).collect();
    if rejected.is_empty() {
        return Ok(());
    }
    rejected.sort_unstable();
    rejected.dedup();
    Err(ValidationError::InvalidCharacters(rejected.into_iter().collect()))
}
