//! Timestamp rendering shared by the backends

use crate::error::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;

/// Check a chrono format string before it is used at render time, since
/// formatting with an invalid one fails on every record
pub(crate) fn validate_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::InvalidConfig(format!(
            "invalid timestamp format {format:?}"
        )));
    }
    Ok(())
}

/// RFC 3339 with as many sub-second digits as needed, or a custom format
pub(crate) fn format_time(time: &DateTime<Utc>, format: Option<&str>) -> String {
    let Some(format) = format else {
        return time.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    };

    let mut text = String::new();
    if write!(text, "{}", time.format(format)).is_err() {
        return time.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    }
    text
}
