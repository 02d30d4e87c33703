//! Line matcher for subtitle documents
//!
//! A `.srt` record is a sequence number, a timing line containing `-->`, one
//! or more text lines and a blank separator. Text lines containing the query
//! are reported with the preceding non-empty line as their timestamp.

use super::types::Occurrence;
use crate::utils::constants::TIMING_MARKER;
use crate::utils::strip_bom;

/// Scan `text` for lines containing `query_lower`
///
/// `query_lower` must already be lowercased; its whitespace is matched
/// literally. Blank lines and timing lines never match. Occurrences keep
/// source line order.
#[must_use]
pub fn scan_document(file_name: &str, text: &str, query_lower: &str) -> Vec<Occurrence> {
    let mut found = Vec::new();
    let mut previous: Option<&str> = None;

    for line in strip_bom(text).lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if !trimmed.contains(TIMING_MARKER) && trimmed.to_lowercase().contains(query_lower) {
            found.push(Occurrence {
                file_name: file_name.to_string(),
                timestamp: previous.unwrap_or_default().to_string(),
                subtitle_text: trimmed.to_string(),
            });
        }

        previous = Some(trimmed);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPISODE: &str = "\u{feff}1\r\n\
00:00:01,000 --> 00:00:03,000\r\n\
We were on a BREAK!\r\n\
\r\n\
2\r\n\
00:00:04,000 --> 00:00:06,000\r\n\
Pivot! Pivot!\r\n\
PIVOT!\r\n";

    #[test]
    fn matches_are_case_insensitive_with_timing_line() {
        let found = scan_document("s03/e15.srt", EPISODE, "break");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file_name, "s03/e15.srt");
        assert_eq!(found[0].timestamp, "00:00:01,000 --> 00:00:03,000");
        assert_eq!(found[0].subtitle_text, "We were on a BREAK!");
    }

    #[test]
    fn second_text_line_takes_previous_text_line_as_timestamp() {
        let found = scan_document("s05/e16.srt", EPISODE, "pivot");
        let stamps: Vec<_> = found.iter().map(|o| o.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["00:00:04,000 --> 00:00:06,000", "Pivot! Pivot!"]);
    }

    #[test]
    fn timing_lines_never_match() {
        assert!(scan_document("a.srt", EPISODE, "00:00").is_empty());
        assert!(scan_document("a.srt", EPISODE, "-->").is_empty());
    }

    #[test]
    fn first_line_match_has_empty_timestamp() {
        let found = scan_document("notes.srt", "how you doin'\n", "doin");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].timestamp, "");
    }
}
