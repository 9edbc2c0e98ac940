//! Validated numeric options.
//!
//! Checked before any retrieval or analysis starts, so a bad value never reaches the API.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Value for `{name}` must be in range of {min} to {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: usize,
        max: usize,
        value: i64,
    },

    #[error("Value for `{name}` is not a number: {value}")]
    NotANumber { name: &'static str, value: String },

    #[error("Invalid search pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Number of entries rendered per analysis section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(usize);

impl Limit {
    pub const MIN: usize = 1;
    pub const MAX: usize = 100;
    pub const DEFAULT: Limit = Limit(3);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        check_range("limit", value, Self::MIN, Self::MAX).map(Limit)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Limit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Limit::new(parse_number("limit", s)?)
    }
}

/// Items requested per page from a listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(usize);

impl PageSize {
    pub const MIN: usize = 1;
    pub const MAX: usize = 1000;
    pub const DEFAULT: PageSize = PageSize(200);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        check_range("page-size", value, Self::MIN, Self::MAX).map(PageSize)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageSize::new(parse_number("page-size", s)?)
    }
}

fn parse_number(name: &'static str, s: &str) -> Result<i64, ValidationError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotANumber {
            name,
            value: s.to_string(),
        })
}

fn check_range(
    name: &'static str,
    value: i64,
    min: usize,
    max: usize,
) -> Result<usize, ValidationError> {
    match usize::try_from(value) {
        Ok(v) if (min..=max).contains(&v) => Ok(v),
        _ => Err(ValidationError::OutOfRange {
            name,
            min,
            max,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_accepts_bounds() {
        assert_eq!(Limit::new(1).unwrap().get(), 1);
        assert_eq!(Limit::new(100).unwrap().get(), 100);
    }

    #[test]
    fn test_limit_rejects_out_of_range() {
        assert!(matches!(
            Limit::new(0),
            Err(ValidationError::OutOfRange { value: 0, .. })
        ));
        assert!(Limit::new(101).is_err());
        assert!(Limit::new(-5).is_err());
    }

    #[test]
    fn test_limit_default_is_three() {
        assert_eq!(Limit::default().get(), 3);
    }

    #[test]
    fn test_limit_from_str() {
        assert_eq!("10".parse::<Limit>().unwrap().get(), 10);
        assert!(matches!(
            "ten".parse::<Limit>(),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_limit_error_message() {
        let err = Limit::new(500).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Value for `limit` must be in range of 1 to 100, got 500"
        );
    }

    #[test]
    fn test_page_size_range() {
        assert_eq!(PageSize::default().get(), 200);
        assert!(PageSize::new(1000).is_ok());
        assert!(PageSize::new(1001).is_err());
        assert!("0".parse::<PageSize>().is_err());
    }
}
