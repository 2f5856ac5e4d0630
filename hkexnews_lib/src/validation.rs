use chrono::NaiveDate;

use crate::error::HkexNewsError;

/// Shortest page delay accepted from the command line. The portal throttles
/// clients that page faster than this.
pub const MIN_DELAY_MS: u64 = 1_000;

/// Longest page delay accepted from the command line (ten minutes).
pub const MAX_DELAY_MS: u64 = 600_000;

pub const MAX_PAGES_LIMIT: u32 = 1000;

/// Validate a SEHK stock code: 1 to 5 digits, optionally followed by `.HK`.
/// Returns the code zero-padded to five digits, the form the search form expects.
pub fn validate_stock_code(input: &str) -> Result<String, HkexNewsError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_suffix(".HK")
        .or_else(|| trimmed.strip_suffix(".hk"))
        .unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 5 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(HkexNewsError::InvalidInput(format!(
            "invalid stock code '{}'. Expected 1-5 digits (e.g., 00763 or 763.HK)",
            trimmed
        )));
    }
    Ok(format!("{:0>5}", digits))
}

/// Validate a date string in YYYY-MM-DD format.
pub fn validate_date(input: &str) -> Result<NaiveDate, HkexNewsError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        HkexNewsError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2018-07-04)",
            trimmed
        ))
    })
}

/// Validate that `from` does not come after `to`.
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> Result<(), HkexNewsError> {
    if from > to {
        return Err(HkexNewsError::InvalidInput(format!(
            "--from ({}) must not be after --to ({})",
            from, to
        )));
    }
    Ok(())
}

/// Validate a page limit: must be 1..=MAX_PAGES_LIMIT.
pub fn validate_max_pages(max_pages: u32) -> Result<u32, HkexNewsError> {
    if !(1..=MAX_PAGES_LIMIT).contains(&max_pages) {
        return Err(HkexNewsError::InvalidInput(format!(
            "max_pages must be between 1 and {}",
            MAX_PAGES_LIMIT
        )));
    }
    Ok(max_pages)
}

/// Validate the delay between page requests: must be MIN_DELAY_MS..=MAX_DELAY_MS.
pub fn validate_delay_ms(delay_ms: u64) -> Result<u64, HkexNewsError> {
    if !(MIN_DELAY_MS..=MAX_DELAY_MS).contains(&delay_ms) {
        return Err(HkexNewsError::InvalidInput(format!(
            "delay_ms must be between {} and {}, got {}",
            MIN_DELAY_MS, MAX_DELAY_MS, delay_ms
        )));
    }
    Ok(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Stock code validation --

    #[test]
    fn stock_code_already_padded() {
        assert_eq!(validate_stock_code("00763").unwrap(), "00763");
    }

    #[test]
    fn stock_code_is_zero_padded() {
        assert_eq!(validate_stock_code("5").unwrap(), "00005");
        assert_eq!(validate_stock_code(" 763 ").unwrap(), "00763");
    }

    #[test]
    fn stock_code_market_suffix_stripped() {
        assert_eq!(validate_stock_code("763.HK").unwrap(), "00763");
        assert_eq!(validate_stock_code("00763.hk").unwrap(), "00763");
    }

    #[test]
    fn stock_code_invalid() {
        assert!(validate_stock_code("").is_err());
        assert!(validate_stock_code(".HK").is_err());
        assert!(validate_stock_code("123456").is_err());
        assert!(validate_stock_code("ZTE").is_err());
        assert!(validate_stock_code("7-63").is_err());
    }

    // -- Date validation --

    #[test]
    fn date_valid() {
        assert_eq!(
            validate_date("2018-07-04").unwrap(),
            NaiveDate::from_ymd_opt(2018, 7, 4).unwrap()
        );
    }

    #[test]
    fn date_invalid_format() {
        assert!(validate_date("04/07/2018").is_err());
        assert!(validate_date("2018-13-01").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn date_range_ordering() {
        let a = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();
        let b = NaiveDate::from_ymd_opt(2018, 7, 20).unwrap();
        assert!(validate_date_range(a, b).is_ok());
        assert!(validate_date_range(a, a).is_ok());
        assert!(matches!(
            validate_date_range(b, a),
            Err(HkexNewsError::InvalidInput(_))
        ));
    }

    // -- Crawl knobs --

    #[test]
    fn max_pages_bounds() {
        assert_eq!(validate_max_pages(1).unwrap(), 1);
        assert_eq!(validate_max_pages(MAX_PAGES_LIMIT).unwrap(), MAX_PAGES_LIMIT);
        assert!(validate_max_pages(0).is_err());
        assert!(validate_max_pages(MAX_PAGES_LIMIT + 1).is_err());
    }

    #[test]
    fn delay_bounds() {
        assert_eq!(validate_delay_ms(MIN_DELAY_MS).unwrap(), MIN_DELAY_MS);
        assert_eq!(validate_delay_ms(4000).unwrap(), 4000);
        assert!(validate_delay_ms(0).is_err());
        assert!(validate_delay_ms(MIN_DELAY_MS - 1).is_err());
        assert!(validate_delay_ms(MAX_DELAY_MS + 1).is_err());
    }
}
