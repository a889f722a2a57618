//! Word-level diff between original and corrected text.

use similar::{ChangeTag, TextDiff};

use proofmark_protocols::{DiffSegment, SegmentKind};

/// Number of whitespace-delimited words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Diff `original` against `corrected` at word granularity.
///
/// Tokens split at whitespace boundaries; punctuation stays attached to the
/// word next to it. Consecutive changes of one kind are merged, and an
/// inserted segment directly followed by a deleted one is swapped so that a
/// replacement always reads old-then-new.
pub fn diff(original: &str, corrected: &str) -> Vec<DiffSegment> {
    let text_diff = TextDiff::from_words(original, corrected);

    let mut segments: Vec<DiffSegment> = Vec::new();
    for change in text_diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => SegmentKind::Unchanged,
            ChangeTag::Delete => SegmentKind::Deleted,
            ChangeTag::Insert => SegmentKind::Inserted,
        };
        push_merged(&mut segments, kind, change.value());
    }

    deleted_before_inserted(&mut segments);
    merge_adjacent(segments)
}

fn push_merged(segments: &mut Vec<DiffSegment>, kind: SegmentKind, text: &str) {
    match segments.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => segments.push(DiffSegment::new(kind, text)),
    }
}

fn deleted_before_inserted(segments: &mut [DiffSegment]) {
    let mut i = 0;
    while i + 1 < segments.len() {
        if segments[i].kind == SegmentKind::Inserted && segments[i + 1].kind == SegmentKind::Deleted {
            segments.swap(i, i + 1);
            i += 2;
        } else {
            i += 1;
        }
    }
}

fn merge_adjacent(segments: Vec<DiffSegment>) -> Vec<DiffSegment> {
    let mut merged: Vec<DiffSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        push_merged(&mut merged, segment.kind, &segment.text);
    }
    merged
}

/// Reconstruct the original text from a segment stream.
pub fn original_text(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.in_original())
        .map(|s| s.text.as_str())
        .collect()
}

/// Reconstruct the corrected text from a segment stream.
pub fn corrected_text(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.in_corrected())
        .map(|s| s.text.as_str())
        .collect()
}

/// Render segments as HTML with `<del>`/`<ins>` markup.
pub fn render_html(segments: &[DiffSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        let text = escape_html(&segment.text);
        match segment.kind {
            SegmentKind::Unchanged => out.push_str(&text),
            SegmentKind::Deleted => {
                out.push_str("<del>");
                out.push_str(&text);
                out.push_str("</del>");
            }
            SegmentKind::Inserted => {
                out.push_str("<ins>");
                out.push_str(&text);
                out.push_str("</ins>");
            }
        }
    }
    out
}

/// Render segments in `[-deleted-]{+inserted+}` word-diff notation.
pub fn render_inline(segments: &[DiffSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment.kind {
            SegmentKind::Unchanged => out.push_str(&segment.text),
            SegmentKind::Deleted => {
                out.push_str("[-");
                out.push_str(&segment.text);
                out.push_str("-]");
            }
            SegmentKind::Inserted => {
                out.push_str("{+");
                out.push_str(&segment.text);
                out.push_str("+}");
            }
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
