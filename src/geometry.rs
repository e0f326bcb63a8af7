//! Page geometry – the immutable per-render configuration: page size,
//! margins, body metrics, QR size, colors, and the footer chrome. Supplied
//! once at render start and read-only thereafter.

use serde::{Deserialize, Serialize};

/// All layout knobs for one letter render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Page width in PDF points (1 pt = 1/72 inch).
    pub page_width: f32,
    /// Page height in PDF points.
    pub page_height: f32,
    /// Uniform page margin in points.
    pub margin: f32,
    /// Space reserved below the top margin for the address window.
    pub top_reserved: f32,

    pub body_font_size: f32,
    pub line_height: f32,
    /// Extra vertical gap after a paragraph (not after bullet items).
    pub paragraph_gap: f32,
    /// Horizontal indent of bullet item text; the glyph sits at the margin.
    pub bullet_indent: f32,

    /// Edge length of the QR code on the page, in points.
    pub qr_size: f32,

    /// Font size reduction for postscript paragraphs.
    pub ps_font_delta: f32,
    /// Line height reduction for postscript paragraphs.
    pub ps_line_height_delta: f32,
    /// Extra gap after a closing-signature paragraph (signature blank).
    pub closing_gap: f32,

    /// Font size of the landing-URL caption under the QR code.
    pub caption_font_size: f32,
    pub footer_font_size: f32,
    pub footer_line_height: f32,

    /// Body text color, RGB 0..1.
    pub text_color: [f32; 3],
    /// Accent color used for the landing-URL caption.
    pub accent_color: [f32; 3],
    pub footer_color: [f32; 3],

    /// Footer chrome: organization contact info and the consent notice.
    /// Empty strings produce blank lines.
    pub footer_lines: Vec<String>,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            // A4: 210mm x 297mm
            page_width: 595.28,
            page_height: 841.89,
            margin: 56.0,
            top_reserved: 160.0,
            body_font_size: 10.5,
            line_height: 15.0,
            paragraph_gap: 7.0,
            bullet_indent: 14.0,
            qr_size: 85.0,
            ps_font_delta: 1.5,
            ps_line_height_delta: 2.0,
            closing_gap: 30.0,
            caption_font_size: 7.0,
            footer_font_size: 7.0,
            footer_line_height: 10.0,
            text_color: [0.1, 0.1, 0.1],
            accent_color: [0.22, 0.51, 0.84],
            footer_color: [0.4, 0.4, 0.4],
            footer_lines: vec![
                "briefpress ist eine Marke der Musterfirma GmbH \u{2013} Musterstra\u{00df}e 12 \u{2013} 60311 Frankfurt am Main".to_string(),
                "kontakt@musterfirma.example \u{2013} www.musterfirma.example".to_string(),
                String::new(),
                "Der QR-Code dient ausschlie\u{00df}lich der technischen Zuordnung und statistischen Auswertung.".to_string(),
                "Wenn Sie keine weiteren Informationen w\u{00fc}nschen, gen\u{00fc}gt eine kurze Mitteilung.".to_string(),
            ],
        }
    }
}

impl PageGeometry {
    /// A4 portrait with default letter styling.
    pub fn a4() -> Self {
        Self::default()
    }

    /// Usable text width between the margins.
    pub fn max_text_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Initial y position of the layout cursor.
    pub fn initial_cursor(&self) -> f32 {
        self.page_height - self.margin - self.top_reserved
    }

    pub fn ps_font_size(&self) -> f32 {
        self.body_font_size - self.ps_font_delta
    }

    pub fn ps_line_height(&self) -> f32 {
        self.line_height - self.ps_line_height_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a4() {
        let geo = PageGeometry::default();
        assert!((geo.page_width - 595.28).abs() < 1e-3);
        assert!((geo.page_height - 841.89).abs() < 1e-3);
        assert!((geo.max_text_width() - (595.28 - 112.0)).abs() < 1e-3);
    }

    #[test]
    fn roundtrips_through_json() {
        let geo = PageGeometry::default();
        let json = serde_json::to_string(&geo).unwrap();
        let back: PageGeometry = serde_json::from_str(&json).unwrap();
        assert_eq!(geo, back);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let geo: PageGeometry = serde_json::from_str(r#"{"qr_size": 100.0}"#).unwrap();
        assert_eq!(geo.qr_size, 100.0);
        assert_eq!(geo.margin, PageGeometry::default().margin);
    }
}
