//! # briefpress – personalized letter HTML → PDF renderer
//!
//! This crate renders direct-mail letters from a constrained HTML subset
//! (paragraphs, bold/italic emphasis, unordered lists, line breaks, one
//! inline QR placeholder) onto a single fixed-size PDF page, deterministically
//! and without a browser. The pipeline stages are:
//!
//! 1. **Substitute** – recipient placeholders → literal values ([`letter`])
//! 2. **Parse** – HTML subset → styled block sequence ([`blocks`])
//! 3. **Layout** – greedy word-wrap with style-run preservation, inline QR
//!    flow, postscript/closing classification ([`layout`])
//! 4. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! The QR bitmap ([`qr`]) encodes the recipient's landing-page URL and is
//! placed inline where the `{{qr_code}}` marker occurs, or in the page's
//! bottom-right corner when no marker is present.

pub mod blocks;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod layout;
pub mod letter;
pub mod pipeline;
pub mod qr;
pub mod render;
pub mod templates;

// Re-exports for convenience
pub use error::LetterError;
pub use geometry::PageGeometry;
pub use letter::Recipient;
pub use pipeline::{generate_letter_batch, generate_letter_pdf, LetterConfig};
