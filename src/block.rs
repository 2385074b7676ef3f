use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::info;

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::provider::DataProvider;

const FORMATS: [&str; 4] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a date (`31/12/2022` or `2022-12-31`) and a time (`23:59:59` or
/// `23:59`) into a UTC instant.
pub fn parse_timestamp(date: &str, time: &str) -> Result<DateTime<Utc>> {
    let input = format!("{} {}", date.trim(), time.trim());

    let parsed = FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&input, format).ok());

    parsed
        .map(|naive| naive.and_utc())
        .ok_or(Error::InvalidTimestamp(input))
}

/// Resolve the block that was current on `chain` at the given date and time.
pub async fn resolve_block<P>(provider: &P, chain: Chain, date: &str, time: &str) -> Result<u64>
where
    P: DataProvider + ?Sized,
{
    let at = parse_timestamp(date, time)?;
    let block = provider.block_at(chain, at.timestamp()).await?;

    info!("Resolved {} on {} to block {}", at, chain, block.block);

    Ok(block.block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;

    #[test]
    fn test_day_first_format() {
        let at = parse_timestamp("31/12/2022", "23:59:59").unwrap();
        assert_eq!(at.timestamp(), 1672531199);
    }

    #[test]
    fn test_iso_date_and_short_time() {
        assert_eq!(
            parse_timestamp("2022-12-31", "23:59:59").unwrap().timestamp(),
            1672531199
        );
        assert_eq!(
            parse_timestamp("2022-12-31", "23:59").unwrap().timestamp(),
            1672531140
        );
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert!(parse_timestamp(" 01/01/2023 ", " 00:00:00").is_ok());
    }

    #[test]
    fn test_malformed_timestamps() {
        for (date, time) in [
            ("31/12/2022", ""),
            ("", "23:59:59"),
            ("12/31/2022", "23:59:59"),
            ("31/12/2022", "25:00:00"),
            ("yesterday", "noon"),
        ] {
            let err = assert_err!(parse_timestamp(date, time));
            assert!(matches!(err, Error::InvalidTimestamp(_)), "{date} {time}");
        }
    }
}
