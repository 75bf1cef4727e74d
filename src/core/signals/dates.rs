//! Regex date scan over raw transcript text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Patterns applied in order; matches of each pattern are appended in text order.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // 12/05/1990, 3-4-84
        r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
        // Bare years
        r"\b\d{4}\b",
        // March 5, 1990 / sept 12 84
        r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{1,2},?\s+\d{2,4}\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
    .collect()
});

/// Find date-like substrings in `text`.
pub fn extract_dates(text: &str) -> Vec<String> {
    DATE_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(text).map(|m| m.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_found() {
        assert_eq!(
            extract_dates("I went to school in 1990 with my mother Anna"),
            vec!["1990".to_string()]
        );
    }

    #[test]
    fn test_numeric_dates() {
        let dates = extract_dates("Born 12/05/1950 and married 3-4-72.");
        assert_eq!(dates[0], "12/05/1950");
        assert_eq!(dates[1], "3-4-72");
        // The year inside the numeric date is also picked up by the year pattern
        assert!(dates.contains(&"1950".to_string()));
    }

    #[test]
    fn test_month_names_case_insensitive() {
        let dates = extract_dates("It was MARCH 5, 1961 and then sept 12 64");
        assert!(dates.contains(&"MARCH 5, 1961".to_string()));
        assert!(dates.contains(&"sept 12 64".to_string()));
    }

    #[test]
    fn test_no_dates() {
        assert!(extract_dates("we walked to the river").is_empty());
        assert!(extract_dates("").is_empty());
        assert!(extract_dates("call 12345 now").is_empty());
    }
}
