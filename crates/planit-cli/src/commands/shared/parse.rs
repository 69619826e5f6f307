use planit_search::PageSize;
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// `all` (or `0`) disables pagination; anything else must be a count.
pub fn parse_page_size(raw: &str) -> anyhow::Result<PageSize> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("all") {
        return Ok(PageSize::All);
    }
    match raw.parse::<usize>() {
        Ok(0) => Ok(PageSize::All),
        Ok(size) => Ok(PageSize::Limit(size)),
        Err(_) => anyhow::bail!("invalid page size '{raw}': expected a number or 'all'"),
    }
}

/// Page size when `--page-size` is absent: the global `--limit` if given,
/// else the configured default. A zero limit lists everything.
#[must_use]
pub fn default_page_size(limit: Option<u32>, configured: u32) -> PageSize {
    match limit.unwrap_or(configured) {
        0 => PageSize::All,
        size => PageSize::Limit(size as usize),
    }
}

#[cfg(test)]
mod tests {
    use planit_core::enums::{SortDirection, SortKey};
    use planit_search::PageSize;

    use super::{default_page_size, parse_enum, parse_page_size};

    #[test]
    fn parses_snake_case_enum() {
        let key: SortKey = parse_enum("median", "sort").expect("sort key should parse");
        assert_eq!(key, SortKey::Median);
    }

    #[test]
    fn parsing_ignores_case() {
        let direction: SortDirection =
            parse_enum("DESC", "direction").expect("direction should parse");
        assert_eq!(direction, SortDirection::Desc);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<SortKey>("credits", "sort").expect_err("should fail");
        assert!(err.to_string().contains("invalid sort 'credits'"));
    }

    #[test]
    fn page_size_accepts_all_and_counts() {
        assert_eq!(parse_page_size("all").expect("all"), PageSize::All);
        assert_eq!(parse_page_size("0").expect("zero"), PageSize::All);
        assert_eq!(parse_page_size("25").expect("count"), PageSize::Limit(25));
        assert!(parse_page_size("-3").is_err());
    }

    #[test]
    fn limit_flag_overrides_configured_page_size() {
        assert_eq!(default_page_size(Some(5), 20), PageSize::Limit(5));
        assert_eq!(default_page_size(None, 20), PageSize::Limit(20));
    }

    #[test]
    fn zero_limit_lists_everything() {
        assert_eq!(default_page_size(Some(0), 20), PageSize::All);
        assert_eq!(default_page_size(None, 0), PageSize::All);
    }
}
