//! Resolution of layout text anchors against the document text buffer.

use tracing::warn;

use crate::models::document::Layout;

/// Resolve the text a layout points at.
///
/// Segments are concatenated in order. A missing start or end offset counts
/// as zero. Segments that fall outside the buffer, or that would split a
/// UTF-8 character, are skipped with a warning. The result is trimmed and
/// every newline becomes a space.
pub fn layout_text(text: &str, layout: Option<&Layout>) -> String {
    let Some(layout) = layout else {
        return String::new();
    };

    let mut out = String::new();
    for segment in layout.segments() {
        let start = segment.start_index.unwrap_or(0);
        let end = segment.end_index.unwrap_or(0);

        if start > end || end > text.len() {
            warn!(
                "Invalid text segment indices: start={}, end={}, doc_len={}",
                start,
                end,
                text.len()
            );
            continue;
        }

        match text.get(start..end) {
            Some(slice) => out.push_str(slice),
            None => warn!(
                "Text segment {}..{} does not fall on character boundaries",
                start, end
            ),
        }
    }

    out.trim().replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::TextSegment;

    const TEXT: &str = "Posting Date\nTransaction\nDetails  Amount";

    #[test]
    fn test_single_segment() {
        let layout = Layout::from_spans(&[(0, 12)]);
        assert_eq!(layout_text(TEXT, Some(&layout)), "Posting Date");
    }

    #[test]
    fn test_joins_segments_and_replaces_newlines() {
        let layout = Layout::from_spans(&[(13, 25), (25, 32)]);
        assert_eq!(layout_text(TEXT, Some(&layout)), "Transaction Details");
    }

    #[test]
    fn test_trims_before_replacing_newlines() {
        let layout = Layout::from_spans(&[(12, 25)]);
        assert_eq!(layout_text(TEXT, Some(&layout)), "Transaction");
    }

    #[test]
    fn test_clean_text_is_unchanged() {
        let layout = Layout::from_spans(&[(34, TEXT.len())]);
        assert_eq!(layout_text(TEXT, Some(&layout)), "Amount");
    }

    #[test]
    fn test_missing_start_counts_as_zero() {
        let mut layout = Layout::from_spans(&[]);
        if let Some(anchor) = layout.text_anchor.as_mut() {
            anchor.text_segments.push(TextSegment {
                start_index: None,
                end_index: Some(7),
            });
        }
        assert_eq!(layout_text(TEXT, Some(&layout)), "Posting");
    }

    #[test]
    fn test_out_of_range_segments_are_skipped() {
        let layout = Layout::from_spans(&[(0, 7), (30, 500), (9, 3)]);
        assert_eq!(layout_text(TEXT, Some(&layout)), "Posting");
    }

    #[test]
    fn test_non_char_boundary_is_skipped() {
        let text = "Café 12,00";
        let layout = Layout::from_spans(&[(0, 4), (5, text.len())]);
        assert_eq!(layout_text(text, Some(&layout)), "12,00");
    }

    #[test]
    fn test_empty_or_absent_layout() {
        assert_eq!(layout_text(TEXT, None), "");
        assert_eq!(layout_text(TEXT, Some(&Layout::default())), "");
    }
}
