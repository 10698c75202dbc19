/// Comparison key for company names and tickers: lowercase ASCII letters and
/// digits only.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
