//! OCR document model.
//!
//! Mirrors the subset of the Document AI `Document` resource the extractor
//! reads: a global text buffer plus pages, tables, rows and cells whose text
//! lives in that buffer and is referenced by offset.

use serde::{Deserialize, Deserializer, Serialize};

/// Structured OCR output for a single processed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    /// Full text of the document; layouts point into this buffer.
    pub text: String,

    /// Pages in reading order.
    pub pages: Vec<Page>,
}

/// A document page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Page {
    /// Tables detected on this page.
    pub tables: Vec<Table>,
}

/// A detected table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Table {
    pub header_rows: Vec<TableRow>,
    pub body_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableCell {
    /// Where the cell's text lives; absent for empty cells.
    pub layout: Option<Layout>,
}

/// Reference into the document text buffer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Layout {
    pub text_anchor: Option<TextAnchor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextAnchor {
    pub text_segments: Vec<TextSegment>,
}

/// A half-open `[start, end)` span over the document text.
///
/// Document AI serializes int64 fields as JSON strings and omits zero values,
/// so both offsets are optional and accept either strings or numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextSegment {
    #[serde(deserialize_with = "de_index", skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(deserialize_with = "de_index", skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
}

impl Document {
    /// Rewrite every text segment from character positions to byte offsets.
    ///
    /// Document AI counts offsets in Unicode characters; the extractor slices
    /// by byte. Positions past the end of the text stay past the end so they
    /// are still rejected downstream.
    pub fn char_offsets_to_bytes(&mut self) {
        if self.text.is_ascii() {
            return;
        }

        let boundaries: Vec<usize> = self
            .text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.text.len()))
            .collect();
        let char_count = boundaries.len() - 1;
        let text_len = self.text.len();
        let to_byte = |pos: usize| {
            boundaries
                .get(pos)
                .copied()
                .unwrap_or(text_len + (pos - char_count))
        };

        let rows = self
            .pages
            .iter_mut()
            .flat_map(|p| p.tables.iter_mut())
            .flat_map(|t| t.header_rows.iter_mut().chain(t.body_rows.iter_mut()));
        for row in rows {
            for anchor in row
                .cells
                .iter_mut()
                .filter_map(|c| c.layout.as_mut())
                .filter_map(|l| l.text_anchor.as_mut())
            {
                for segment in anchor.text_segments.iter_mut() {
                    segment.start_index = segment.start_index.map(to_byte);
                    segment.end_index = segment.end_index.map(to_byte);
                }
            }
        }
    }
}

impl TextSegment {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start_index: Some(start),
            end_index: Some(end),
        }
    }
}

impl Layout {
    /// Build a layout from `(start, end)` spans.
    pub fn from_spans(spans: &[(usize, usize)]) -> Self {
        Self {
            text_anchor: Some(TextAnchor {
                text_segments: spans.iter().map(|&(s, e)| TextSegment::new(s, e)).collect(),
            }),
        }
    }

    /// Segments referenced by this layout, empty when there is no anchor.
    pub fn segments(&self) -> &[TextSegment] {
        self.text_anchor
            .as_ref()
            .map(|a| a.text_segments.as_slice())
            .unwrap_or_default()
    }
}

impl TableRow {
    /// Row whose cells each point at one span.
    pub fn from_spans(spans: &[(usize, usize)]) -> Self {
        Self {
            cells: spans
                .iter()
                .map(|&span| TableCell {
                    layout: Some(Layout::from_spans(&[span])),
                })
                .collect(),
        }
    }
}

fn de_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Index {
        Number(u64),
        Text(String),
    }

    match Option::<Index>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Index::Number(n)) => usize::try_from(n)
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(Index::Text(s)) => s
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
