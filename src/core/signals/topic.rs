//! Keyword topic classification.

/// Label used when no keyword group matches.
pub const DEFAULT_TOPIC: &str = "Life Memory";

/// Keyword groups in priority order; the first group with a hit wins.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("History and Service", &["war", "army", "soldier", "battle"]),
    ("Education Journey", &["school", "college", "teacher", "study"]),
    ("Family Life", &["mother", "father", "family", "children"]),
    ("Work and Career", &["work", "factory", "job", "company"]),
];

/// Classify `text` by substring keyword matching on its lowercase form.
pub fn detect_topic(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(topic, _)| *topic)
        .unwrap_or(DEFAULT_TOPIC)
}
