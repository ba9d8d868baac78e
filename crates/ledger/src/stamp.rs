//! Timestamp rendering shared by the tabular artifacts.

use time::OffsetDateTime;
use time::macros::format_description;

/// Human-readable ledger timestamps: `2019.06.27 14:03:55`.
pub fn ledger(at: OffsetDateTime) -> String {
    at.format(format_description!("[year].[month].[day] [hour]:[minute]:[second]"))
        .unwrap_or_default()
}

/// Filename-safe timestamps for transfer ledgers: `0627_140355`.
pub fn file(at: OffsetDateTime) -> String {
    at.format(format_description!("[month][day]_[hour][minute][second]")).unwrap_or_default()
}

/// The current wall-clock time in the operator's timezone, falling back to
/// UTC when the local offset cannot be determined (multi-threaded Unix).
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_ledger_format() {
        assert_eq!(ledger(datetime!(2019-06-27 14:03:55 UTC)), "2019.06.27 14:03:55");
    }

    #[test]
    fn test_file_format() {
        assert_eq!(file(datetime!(2019-06-27 14:03:55 UTC)), "0627_140355");
    }
}
