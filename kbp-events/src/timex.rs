//! TIMEX-style calendar dates with unspecified positions

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::Error;

const POSITIONS: usize = 8;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9X]{4})(?:-([0-9X]{2})(?:-([0-9X]{2}))?)?$").expect("static date pattern")
    })
}

/// A date such as `2014-05-XX`: year, month and day digits, any of which may
/// be left unspecified. Missing trailing components count as unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimexDate {
    digits: [Option<u8>; POSITIONS],
}

impl TimexDate {
    pub fn parse(text: &str) -> Option<Self> {
        let captures = date_pattern().captures(text.trim())?;
        let mut digits = [None; POSITIONS];
        let specified = (1..=3)
            .filter_map(|group| captures.get(group))
            .flat_map(|m| m.as_str().chars());
        for (slot, c) in digits.iter_mut().zip(specified) {
            *slot = c.to_digit(10).map(|d| d as u8);
        }
        Some(Self { digits })
    }

    pub fn specified_positions(&self) -> usize {
        self.digits.iter().filter(|d| d.is_some()).count()
    }

    /// True when `self` agrees with `other` wherever `self` is specified and
    /// leaves at least one position open that `other` fills in.
    pub fn is_less_specific_than(&self, other: &TimexDate) -> bool {
        let compatible = self
            .digits
            .iter()
            .zip(other.digits.iter())
            .all(|(mine, theirs)| mine.is_none() || mine == theirs);
        compatible && self.specified_positions() < other.specified_positions()
    }
}

impl FromStr for TimexDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimexDate::parse(s).ok_or_else(|| Error::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for TimexDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, digit) in self.digits.iter().enumerate() {
            if i == 4 || i == 6 {
                write!(f, "-")?;
            }
            match digit {
                Some(d) => write!(f, "{}", d)?,
                None => write!(f, "X")?,
            }
        }
        Ok(())
    }
}
