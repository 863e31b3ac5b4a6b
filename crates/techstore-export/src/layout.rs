//! Shared printpdf layout helpers (page geometry, text placement).

use printpdf::{IndirectFontRef, Line, Mm, PdfDocumentReference, PdfLayerReference, Point};

use crate::error::{ExportError, ExportResult};

/// A4 portrait, in millimeters.
pub(crate) const PAGE_WIDTH: f32 = 210.0;
pub(crate) const PAGE_HEIGHT: f32 = 297.0;
pub(crate) const MARGIN: f32 = 20.0;

/// Places a line of text at (x, y) from the bottom-left origin.
pub(crate) fn text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    content: &str,
    size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(content, size, Mm(x), Mm(y), font);
}

/// Approximate rendered width of Helvetica text, in millimeters.
///
/// Builtin fonts carry no metrics in printpdf; an average advance of
/// half an em is close enough for centering and right-alignment of the
/// short strings these documents use.
pub(crate) fn text_width(content: &str, size: f32) -> f32 {
    const PT_TO_MM: f32 = 0.3528;
    content.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

/// Centers a line of text horizontally on the page.
pub(crate) fn centered(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    content: &str,
    size: f32,
    y: f32,
) {
    let x = (PAGE_WIDTH - text_width(content, size)) / 2.0;
    text(layer, font, content, size, x.max(MARGIN), y);
}

/// Right-aligns a line of text so it ends at `right_x`.
pub(crate) fn right_aligned(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    content: &str,
    size: f32,
    right_x: f32,
    y: f32,
) {
    let x = right_x - text_width(content, size);
    text(layer, font, content, size, x, y);
}

/// Horizontal rule from x1 to x2 at height y.
pub(crate) fn hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Clips cell text to a column width, appending an ellipsis.
pub(crate) fn clip(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let mut clipped: String = content.chars().take(max_chars.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}

/// Serializes the finished document to bytes.
pub(crate) fn save_bytes(doc: PdfDocumentReference) -> ExportResult<Vec<u8>> {
    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("exactly-10", 10), "exactly-10");
        assert_eq!(clip("rather too long", 8), "rather …");
    }

    #[test]
    fn test_text_width_scales_with_length() {
        assert!(text_width("aaaa", 10.0) > text_width("aa", 10.0));
        assert_eq!(text_width("", 10.0), 0.0);
    }
}
