use tokio::sync::watch;

use crate::{Error, NoteRecord};

/// Persistence seam for note records.
///
/// Every method is atomic for a single record; there are no transactions
/// spanning several notes. Implementations bump the value behind
/// [`NoteStore::subscribe`] after each committed write so that live views
/// can re-query.
#[async_trait::async_trait]
pub trait NoteStore: Send + Sync {
    /// All records, newest `note_date` first.
    async fn list_all(&self) -> Result<Vec<NoteRecord>, Error>;

    /// Look up a record by id.
    async fn get(&self, id: &str) -> Result<Option<NoteRecord>, Error>;

    /// Records whose title or description contains `text`, ignoring case.
    /// No ordering is guaranteed.
    async fn search(&self, text: &str) -> Result<Vec<NoteRecord>, Error>;

    /// Insert the record, replacing any existing record with the same id.
    async fn upsert(&self, record: NoteRecord) -> Result<(), Error>;

    /// Delete a record by id. Returns true if a record was removed.
    async fn delete(&self, id: &str) -> Result<bool, Error>;

    /// Change notifications; the value increases after every write.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Case-insensitive literal matcher for search text.
///
/// Both sides are lowercased, so any query length works and nothing in the
/// text is treated as a pattern.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    pub fn is_match(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }
}

pub fn text_matcher(text: &str) -> TextMatcher {
    TextMatcher {
        needle: text.to_lowercase(),
    }
}

/// Whether a record matches a matcher built by [`text_matcher`].
pub fn record_matches(record: &NoteRecord, matcher: &TextMatcher) -> bool {
    matcher.is_match(&record.note_title) || matcher.is_match(&record.note_description)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, description: &str) -> NoteRecord {
        NoteRecord {
            note_id: "id".to_string(),
            note_title: title.to_string(),
            note_subtitle: "ignored subtitle match".to_string(),
            note_description: description.to_string(),
            note_image: None,
            note_date: 0,
        }
    }

    #[test]
    fn test_matcher_is_literal_and_case_insensitive() {
        let m = text_matcher("A.B");
        assert!(record_matches(&record("xa.bx", ""), &m));
        assert!(!record_matches(&record("aXb", ""), &m));

        let m = text_matcher("ÇAY");
        assert!(record_matches(&record("", "bir çay lütfen"), &m));
    }

    #[test]
    fn test_very_long_query_still_matches() {
        let query = "é".repeat(400_000);
        let m = text_matcher(&query);
        let description = format!("before {} after", "É".repeat(400_000));
        assert!(record_matches(&record("", &description), &m));
        assert!(!record_matches(&record("é", "é é"), &m));
    }

    #[test]
    fn test_subtitle_is_not_searched() {
        let m = text_matcher("subtitle");
        assert!(!record_matches(&record("title", "description"), &m));
    }
}
