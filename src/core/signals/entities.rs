//! Merging of labeler output and the regex date scan into entity lists.

use std::sync::Arc;
use tracing::{debug, warn};

use super::cleanup::{ENTITY_BLOCKLIST, clean_items};
use super::dates::extract_dates;
use super::{EntityLabeler, EntitySpan};
use crate::core::types::ExtractedEntities;

/// Language code for which the English labeler runs.
const ENGLISH: &str = "en";

/// Combines a multilingual labeler (people, places) with an English-only
/// labeler (people, places, dates) and the regex date scan.
///
/// The multilingual labeler is read with CoNLL tags (`PER`, `LOC`). The
/// English labeler is read with OntoNotes tags (`PERSON`, `GPE`, `LOC`,
/// `FAC`, `DATE`, `TIME`). Tags are matched after [`normalize_label`].
#[derive(Clone, Default)]
pub struct EntityExtractor {
    multilingual: Option<Arc<dyn EntityLabeler>>,
    english: Option<Arc<dyn EntityLabeler>>,
}

#[derive(Default)]
struct Candidates {
    people: Vec<String>,
    places: Vec<String>,
    dates: Vec<String>,
}

impl EntityExtractor {
    pub fn new(
        multilingual: Option<Arc<dyn EntityLabeler>>,
        english: Option<Arc<dyn EntityLabeler>>,
    ) -> Self {
        Self {
            multilingual,
            english,
        }
    }

    pub async fn extract(&self, text: &str, language_code: &str) -> ExtractedEntities {
        let mut candidates = Candidates::default();

        if !text.trim().is_empty() {
            if let Some(labeler) = &self.multilingual {
                for span in run_labeler(labeler.as_ref(), text, "multilingual").await {
                    match normalize_label(&span.label).as_str() {
                        "PER" | "PERSON" => candidates.people.push(span.text),
                        "LOC" | "LOCATION" => candidates.places.push(span.text),
                        _ => {}
                    }
                }
            }

            if language_code == ENGLISH {
                if let Some(labeler) = &self.english {
                    for span in run_labeler(labeler.as_ref(), text, "english").await {
                        match normalize_label(&span.label).as_str() {
                            "PER" | "PERSON" => candidates.people.push(span.text),
                            "GPE" | "LOC" | "LOCATION" | "FAC" => {
                                candidates.places.push(span.text)
                            }
                            "DATE" | "TIME" => candidates.dates.push(span.text),
                            _ => {}
                        }
                    }
                }
            }
        }

        candidates.dates.extend(extract_dates(text));

        ExtractedEntities {
            people: clean_items(&candidates.people, ENTITY_BLOCKLIST),
            places: clean_items(&candidates.places, ENTITY_BLOCKLIST),
            dates: clean_items(&candidates.dates, &[]),
        }
    }
}

/// Upper-case a tag and drop any BIO prefix, so `B-date` reads as `DATE`.
fn normalize_label(label: &str) -> String {
    let label = label.trim();
    let bare = label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .or_else(|| label.strip_prefix("b-"))
        .or_else(|| label.strip_prefix("i-"))
        .unwrap_or(label);
    bare.to_ascii_uppercase()
}

/// Run one labeler; a failure contributes no spans.
async fn run_labeler(labeler: &dyn EntityLabeler, text: &str, name: &str) -> Vec<EntitySpan> {
    match labeler.label(text).await {
        Ok(spans) => {
            debug!(labeler = name, spans = spans.len(), "Entity labeling finished");
            spans
        }
        Err(e) => {
            warn!(labeler = name, error = %e, "Entity labeler failed, skipping its output");
            Vec::new()
        }
    }
}
