//! Table output.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// Create a table with a header row, wrapping to the terminal width.
pub fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Truncate a string to `max` characters, appending "..." if truncated.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_rendered() {
        let mut table = new_table(["Key", "Status"]);
        table.add_row(vec!["price", "saved"]);
        let out = table.to_string();
        assert!(out.contains("Key"));
        assert!(out.contains("price"));
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_is_char_aware() {
        assert_eq!(truncate_str("Preis für Äpfel", 8), "Preis...");
    }
}
