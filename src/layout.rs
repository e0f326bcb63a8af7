//! Page layout engine – consumes the parsed block sequence and a page
//! geometry and emits a flat list of positioned draw primitives.
//!
//! The engine performs greedy word-wrapping per block while preserving style
//! run boundaries, classifies postscript and closing-signature paragraphs for
//! differentiated metrics, tracks a monotonically decreasing vertical cursor,
//! and places the QR code inline where the marker block occurs (or once in
//! the bottom-right corner as a fallback). The output is an intermediate
//! representation; [`crate::render`] turns it into PDF bytes.

use serde::{Deserialize, Serialize};

use crate::blocks::{Block, TextSpan};
use crate::fonts;
use crate::geometry::PageGeometry;

/// Gap between the inline QR image (plus caption) and the following block.
const QR_TRAILING_GAP: f32 = 36.0;
/// Drop from the image bottom edge to the caption baseline, inline flow.
const QR_CAPTION_DROP: f32 = 10.0;
/// Bottom edge of the fallback QR above the page margin.
const QR_FALLBACK_RAISE: f32 = 15.0;
/// Drop from the fallback QR to its caption baseline.
const QR_FALLBACK_CAPTION_DROP: f32 = 12.0;
/// Baseline of the first footer line above the bottom page edge.
const FOOTER_BASELINE: f32 = 50.0;

/// One styled subrun within a laid-out line. Subruns are drawn left to right,
/// each measured with its own font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subrun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Subrun {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

/// A positioned draw primitive on the single letter page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageOp {
    /// One text line; `y` is the baseline, subruns advance from `x`.
    Text {
        x: f32,
        y: f32,
        size: f32,
        color: [f32; 3],
        runs: Vec<Subrun>,
    },
    /// Image placement; `(x, y)` is the bottom-left corner.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// The laid-out letter: draw primitives in paint order plus the QR placement
/// mode that was chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterLayout {
    pub ops: Vec<PageOp>,
    /// True when an inline `{{qr_code}}` marker placed the QR; false when the
    /// bottom-right fallback was used.
    pub qr_inline: bool,
}

/// Lay out the parsed blocks onto one fixed-size page.
///
/// `landing_url` is drawn as the caption under the QR code. The document
/// always carries exactly one QR image: inline if a marker block occurs,
/// otherwise in the bottom-right corner.
pub fn lay_out_letter(blocks: &[Block], geo: &PageGeometry, landing_url: &str) -> LetterLayout {
    let mut ops = Vec::new();
    let mut y = geo.initial_cursor();
    let mut qr_inline = false;

    for block in blocks {
        match block {
            Block::QrCode => {
                place_inline_qr(&mut ops, geo, landing_url, &mut y);
                qr_inline = true;
            }
            Block::Text { spans, bullet } => {
                let flat = flatten_spans(spans).to_lowercase();
                if is_postscript(&flat) {
                    let metrics = WrapMetrics {
                        size: geo.ps_font_size(),
                        line_height: geo.ps_line_height(),
                        bullet: false,
                    };
                    wrap_paragraph(&mut ops, spans, geo, metrics, &mut y);
                    y -= geo.paragraph_gap;
                } else {
                    let metrics = WrapMetrics {
                        size: geo.body_font_size,
                        line_height: geo.line_height,
                        bullet: *bullet,
                    };
                    wrap_paragraph(&mut ops, spans, geo, metrics, &mut y);
                    // List items stay visually contiguous.
                    if !bullet {
                        y -= geo.paragraph_gap;
                    }
                    if is_closing(&flat) {
                        y -= geo.closing_gap;
                    }
                }
            }
        }
    }

    if !qr_inline {
        place_fallback_qr(&mut ops, geo, landing_url);
    }
    draw_footer(&mut ops, geo);

    LetterLayout { ops, qr_inline }
}

/// Concatenated plain text of a block's spans.
pub fn flatten_spans(spans: &[TextSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// A paragraph whose flattened text starts like a postscript line.
fn is_postscript(lowercase_text: &str) -> bool {
    lowercase_text.starts_with("p.s.")
        || lowercase_text.starts_with("ps:")
        || lowercase_text.starts_with("p.s:")
}

/// A paragraph containing a German letter-closing phrase. This is a phrase
/// heuristic; a body paragraph containing one of these substrings is treated
/// as the closing too.
fn is_closing(lowercase_text: &str) -> bool {
    lowercase_text.contains("herzliche gr")
        || lowercase_text.contains("mit freundlichen")
        || lowercase_text.contains("beste gr")
}

// ---------------------------------------------------------------------------
// Greedy word-wrap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct WrapMetrics {
    size: f32,
    line_height: f32,
    bullet: bool,
}

/// Precomputed char-offset -> style lookup over a block's concatenated text.
/// Offsets past the last span fall back to plain.
struct StyleTable {
    /// Exclusive cumulative end offset (in chars) per span, with its style.
    bounds: Vec<(usize, bool, bool)>,
}

impl StyleTable {
    fn new(spans: &[TextSpan]) -> Self {
        let mut bounds = Vec::with_capacity(spans.len());
        let mut cum = 0;
        for span in spans {
            cum += span.text.chars().count();
            bounds.push((cum, span.bold, span.italic));
        }
        Self { bounds }
    }

    fn style_at(&self, offset: usize) -> (bool, bool) {
        for &(end, bold, italic) in &self.bounds {
            if offset < end {
                return (bold, italic);
            }
        }
        (false, false)
    }
}

/// Wrap one block's spans into lines and emit them, advancing the cursor.
///
/// Words are packed greedily: a word moves to a new line when appending it
/// would exceed the available width and the line already has content, so a
/// single word wider than the column is placed alone (overflow allowed).
/// Adjacent same-style words merge into one subrun joined by a literal space.
/// Explicit newlines force a break; blank lines consume one line height.
fn wrap_paragraph(
    ops: &mut Vec<PageOp>,
    spans: &[TextSpan],
    geo: &PageGeometry,
    m: WrapMetrics,
    y: &mut f32,
) {
    let x_start = if m.bullet {
        geo.margin + geo.bullet_indent
    } else {
        geo.margin
    };
    let available = if m.bullet {
        geo.max_text_width() - geo.bullet_indent
    } else {
        geo.max_text_width()
    };

    if m.bullet {
        // Glyph sits at the margin, outside the indented text column.
        ops.push(PageOp::Text {
            x: geo.margin,
            y: *y,
            size: m.size,
            color: geo.text_color,
            runs: vec![Subrun::plain("\u{2022}")],
        });
    }

    let styles = StyleTable::new(spans);
    let text = flatten_spans(spans);

    // Char offset of the current line start within the block text.
    let mut offset = 0usize;
    for line in text.split('\n') {
        let line_chars = line.chars().count();
        if line.trim().is_empty() {
            *y -= m.line_height;
            offset += line_chars + 1;
            continue;
        }

        let mut runs: Vec<Subrun> = Vec::new();
        let mut line_width = 0.0f32;
        // Char offset of the current word within this line.
        let mut col = 0usize;

        for word in line.split(' ') {
            let word_chars = word.chars().count();
            if word.is_empty() {
                col += 1;
                continue;
            }

            let (bold, italic) = styles.style_at(offset + col);
            let word_width = fonts::text_width(word, bold, m.size);
            let space_width = fonts::text_width(" ", bold, m.size);
            let add = if runs.is_empty() {
                word_width
            } else {
                space_width + word_width
            };

            if line_width + add > available && !runs.is_empty() {
                flush_line(ops, std::mem::take(&mut runs), x_start, *y, m.size, geo);
                *y -= m.line_height;
                runs.push(Subrun {
                    text: word.to_string(),
                    bold,
                    italic,
                });
                line_width = word_width;
            } else {
                match runs.last_mut() {
                    Some(last) if last.bold == bold && last.italic == italic => {
                        last.text.push(' ');
                        last.text.push_str(word);
                    }
                    Some(_) => runs.push(Subrun {
                        text: format!(" {word}"),
                        bold,
                        italic,
                    }),
                    None => runs.push(Subrun {
                        text: word.to_string(),
                        bold,
                        italic,
                    }),
                }
                line_width += add;
            }

            col += word_chars + 1;
        }

        if !runs.is_empty() {
            flush_line(ops, runs, x_start, *y, m.size, geo);
            *y -= m.line_height;
        }
        offset += line_chars + 1;
    }
}

fn flush_line(
    ops: &mut Vec<PageOp>,
    runs: Vec<Subrun>,
    x: f32,
    y: f32,
    size: f32,
    geo: &PageGeometry,
) {
    ops.push(PageOp::Text {
        x,
        y,
        size,
        color: geo.text_color,
        runs,
    });
}

// ---------------------------------------------------------------------------
// QR placement and footer chrome
// ---------------------------------------------------------------------------

fn place_inline_qr(ops: &mut Vec<PageOp>, geo: &PageGeometry, landing_url: &str, y: &mut f32) {
    *y -= geo.paragraph_gap;
    let qr_x = (geo.page_width - geo.qr_size) / 2.0;
    ops.push(PageOp::Image {
        x: qr_x,
        y: *y - geo.qr_size,
        width: geo.qr_size,
        height: geo.qr_size,
    });

    let caption_width = fonts::text_width(landing_url, false, geo.caption_font_size);
    ops.push(PageOp::Text {
        x: (geo.page_width - caption_width) / 2.0,
        y: *y - geo.qr_size - QR_CAPTION_DROP,
        size: geo.caption_font_size,
        color: geo.accent_color,
        runs: vec![Subrun::plain(landing_url)],
    });

    *y -= geo.qr_size + QR_TRAILING_GAP;
}

/// Bottom-right corner placement used when no inline marker occurred. The
/// document is never rendered without a visible QR code.
fn place_fallback_qr(ops: &mut Vec<PageOp>, geo: &PageGeometry, landing_url: &str) {
    let qr_x = geo.page_width - geo.margin - geo.qr_size;
    let qr_y = geo.margin + QR_FALLBACK_RAISE;
    ops.push(PageOp::Image {
        x: qr_x,
        y: qr_y,
        width: geo.qr_size,
        height: geo.qr_size,
    });
    ops.push(PageOp::Text {
        x: qr_x,
        y: qr_y - QR_FALLBACK_CAPTION_DROP,
        size: geo.caption_font_size,
        color: geo.accent_color,
        runs: vec![Subrun::plain(landing_url)],
    });
}

fn draw_footer(ops: &mut Vec<PageOp>, geo: &PageGeometry) {
    let mut footer_y = geo.margin + FOOTER_BASELINE;
    for line in &geo.footer_lines {
        if !line.is_empty() {
            ops.push(PageOp::Text {
                x: geo.margin,
                y: footer_y,
                size: geo.footer_font_size,
                color: geo.footer_color,
                runs: vec![Subrun::plain(line.as_str())],
            });
        }
        footer_y -= geo.footer_line_height;
    }
}
