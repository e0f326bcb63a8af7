//! QR code generation – encodes the per-recipient landing URL into a PNG
//! bitmap that the renderer embeds as an opaque image asset.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use qrcode::{Color as ModuleColor, QrCode};

use crate::error::LetterError;

/// Target edge length of the generated bitmap in pixels.
const TARGET_PX: u32 = 150;
/// Quiet-zone width in modules on each side.
const QUIET_ZONE: u32 = 1;

const DARK: Rgb<u8> = Rgb([26, 26, 26]);
const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

/// The landing-page URL for one recipient: `<base>/r/<token>`.
pub fn landing_url(base_url: &str, token: &str) -> String {
    format!("{}/r/{}", base_url.trim_end_matches('/'), token)
}

/// Render `url` as a QR code PNG. Deterministic: the same URL always yields
/// the same bytes.
pub fn qr_png(url: &str) -> Result<Vec<u8>, LetterError> {
    let code = QrCode::new(url.as_bytes())?;
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let total = modules + 2 * QUIET_ZONE;
    let scale = (TARGET_PX / total).max(1);
    let dim = total * scale;

    let mut img = RgbImage::from_pixel(dim, dim, LIGHT);
    for (i, color) in colors.iter().enumerate() {
        if *color != ModuleColor::Dark {
            continue;
        }
        let mx = i as u32 % modules;
        let my = i as u32 / modules;
        let x0 = (mx + QUIET_ZONE) * scale;
        let y0 = (my + QUIET_ZONE) * scale;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(x0 + dx, y0 + dy, DARK);
            }
        }
    }

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_pattern() {
        assert_eq!(
            landing_url("https://example.com", "abc123"),
            "https://example.com/r/abc123"
        );
        assert_eq!(
            landing_url("https://example.com/", "abc123"),
            "https://example.com/r/abc123"
        );
    }

    #[test]
    fn png_has_magic_bytes() {
        let png = qr_png("https://example.com/r/test").unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = qr_png("https://example.com/r/tok").unwrap();
        let b = qr_png("https://example.com/r/tok").unwrap();
        assert_eq!(a, b);
    }
}
