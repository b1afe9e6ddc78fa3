use std::fmt::Write as _;
use std::time::SystemTime;

use chrono::{DateTime, Local};

pub trait SystemTimeExt {
    fn to_local(&self) -> DateTime<Local>;

    /// Formats the instant in local time with a strftime-style pattern.
    /// Fails instead of panicking when the pattern contains invalid items.
    fn format_local(&self, date_format: &str) -> Result<String, std::fmt::Error> {
        let mut formatted = String::new();
        write!(formatted, "{}", self.to_local().format(date_format))?;
        Ok(formatted)
    }
}

impl SystemTimeExt for SystemTime {
    fn to_local(&self) -> DateTime<Local> {
        DateTime::<Local>::from(*self)
    }
}
