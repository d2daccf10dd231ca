/// Lowercases and keeps only alphanumeric characters, so "Hide on Bush"
/// and "hideonbush!" compare equal. Missing input normalizes to "".
pub fn normalize(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Shorthand for the common non-optional case.
pub fn normalize_str(raw: &str) -> String {
    normalize(Some(raw))
}
