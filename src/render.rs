//! PDF renderer – takes a [`LetterLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API) with the builtin Helvetica family.

use printpdf::*;

use crate::error::LetterError;
use crate::fonts;
use crate::geometry::PageGeometry;
use crate::layout::{LetterLayout, PageOp, Subrun};

/// Render a laid-out letter into PDF bytes.
///
/// `qr_png` is the QR bitmap; it is embedded once as an XObject and
/// referenced by every image placement. A bitmap that cannot be decoded or
/// embedded is a fatal error: a letter without a verifiable QR code is not a
/// valid output.
pub fn render_pdf(
    layout: &LetterLayout,
    geo: &PageGeometry,
    qr_png: &[u8],
    title: &str,
) -> Result<Vec<u8>, LetterError> {
    let mut doc = PdfDocument::new(title);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();

    // Decode once with the `image` crate to obtain pixel dimensions for
    // XObject scaling (printpdf places 1 px = 1 pt at dpi 72).
    let dyn_img = ::image::load_from_memory(qr_png)?;
    let (px_width, px_height) = (dyn_img.width(), dyn_img.height());

    let raw = RawImage::decode_from_bytes(qr_png, &mut warnings)
        .map_err(|e| LetterError::ImageEmbed(e.to_string()))?;
    // Fixed resource name; `add_image` would generate a random one per call
    // and identical inputs must produce byte-identical documents.
    let xobj_id = XObjectId("QrImage".to_string());
    doc.resources
        .xobjects
        .map
        .insert(xobj_id.clone(), XObject::Image(raw));

    let mut ops: Vec<Op> = Vec::new();
    for op in &layout.ops {
        match op {
            PageOp::Text {
                x,
                y,
                size,
                color,
                runs,
            } => draw_text_line(&mut ops, *x, *y, *size, *color, runs),
            PageOp::Image {
                x,
                y,
                width,
                height,
            } => {
                let scale_x = if px_width > 0 {
                    width / px_width as f32
                } else {
                    1.0
                };
                let scale_y = if px_height > 0 {
                    height / px_height as f32
                } else {
                    1.0
                };
                ops.push(Op::UseXobject {
                    id: xobj_id.clone(),
                    transform: XObjectTransform {
                        translate_x: Some(Pt(*x)),
                        translate_y: Some(Pt(*y)),
                        dpi: Some(72.0),
                        scale_x: Some(scale_x),
                        scale_y: Some(scale_y),
                        rotate: None,
                    },
                });
            }
        }
    }

    let page_w = Mm(geo.page_width * 0.352778); // pt -> mm
    let page_h = Mm(geo.page_height * 0.352778);
    let page = PdfPage::new(page_w, page_h, ops);
    doc.with_pages(vec![page]);

    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

/// Map a style combination onto the builtin Helvetica variants.
fn builtin_font(bold: bool, italic: bool) -> BuiltinFont {
    match (bold, italic) {
        (true, true) => BuiltinFont::HelveticaBoldOblique,
        (true, false) => BuiltinFont::HelveticaBold,
        (false, true) => BuiltinFont::HelveticaOblique,
        (false, false) => BuiltinFont::Helvetica,
    }
}

/// Draw one line's subruns left to right, advancing the pen by each subrun's
/// measured width.
fn draw_text_line(ops: &mut Vec<Op>, x: f32, y: f32, size: f32, color: [f32; 3], runs: &[Subrun]) {
    let mut pen_x = x;
    for run in runs {
        if run.text.is_empty() {
            continue;
        }
        let font = builtin_font(run.bold, run.italic);

        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(pen_x),
                y: Pt(y),
            },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font,
        });
        ops.push(Op::SetFillColor {
            col: Color::Rgb(Rgb {
                r: color[0],
                g: color[1],
                b: color[2],
                icc_profile: None,
            }),
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(to_winlatin(&run.text))],
            font,
        });
        ops.push(Op::EndTextSection);

        pen_x += fonts::text_width(&run.text, run.bold, size);
    }
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{201A}' => 0x82, // single low-9 quote
            '\u{201E}' => 0x84, // double low-9 quote
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{2122}' => 0x99, // trademark
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the 0x80-0x9F range; printpdf passes
    // these bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}
