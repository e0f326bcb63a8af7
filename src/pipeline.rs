//! Pipeline – ties together placeholder substitution, markup parsing, QR
//! generation, layout, and rendering into a single call.

use crate::blocks::parse_to_blocks;
use crate::error::LetterError;
use crate::geometry::PageGeometry;
use crate::layout::{lay_out_letter, LetterLayout};
use crate::letter::{letter_filename, substitute_placeholders, Recipient};
use crate::qr::{landing_url, qr_png};
use crate::render::render_pdf;

/// Configuration for letter generation.
#[derive(Debug, Clone)]
pub struct LetterConfig {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    /// Base URL for the per-recipient landing page (`<base>/r/<token>`).
    pub base_url: String,
    pub geometry: PageGeometry,
}

impl Default for LetterConfig {
    fn default() -> Self {
        Self {
            title: "Letter".to_string(),
            base_url: "https://example.com".to_string(),
            geometry: PageGeometry::default(),
        }
    }
}

/// Full pipeline: letter HTML + recipient → PDF bytes.
///
/// Placeholders are substituted before parsing; the QR code encodes the
/// recipient's landing URL. Each call is an independent synchronous
/// computation, so many letters may render concurrently.
pub fn generate_letter_pdf(
    body_html: &str,
    recipient: &Recipient,
    personalized_intro: Option<&str>,
    config: &LetterConfig,
) -> Result<Vec<u8>, LetterError> {
    let processed = substitute_placeholders(body_html, recipient, personalized_intro);
    let blocks = parse_to_blocks(&processed);
    log::debug!(
        "parsed {} block(s) for recipient token '{}'",
        blocks.len(),
        recipient.token
    );

    let url = landing_url(&config.base_url, &recipient.token);
    let png = qr_png(&url)?;
    let layout = lay_out_letter(&blocks, &config.geometry, &url);
    render_pdf(&layout, &config.geometry, &png, &config.title)
}

/// Layout-only pipeline (no PDF rendering) – useful for tests and previews.
pub fn compute_letter_layout(
    body_html: &str,
    recipient: &Recipient,
    personalized_intro: Option<&str>,
    config: &LetterConfig,
) -> LetterLayout {
    let processed = substitute_placeholders(body_html, recipient, personalized_intro);
    let blocks = parse_to_blocks(&processed);
    let url = landing_url(&config.base_url, &recipient.token);
    lay_out_letter(&blocks, &config.geometry, &url)
}

/// One unit of work in a batch export.
#[derive(Debug, Clone)]
pub struct LetterJob {
    pub recipient: Recipient,
    pub body_html: String,
    pub personalized_intro: Option<String>,
}

/// Result of a batch export: generated `(filename, bytes)` pairs plus one
/// error message per failed recipient.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub generated: Vec<(String, Vec<u8>)>,
    pub errors: Vec<String>,
}

/// Render a batch of letters, continuing past per-item failures. Failures are
/// collected with the recipient's name attached so the caller can report a
/// partial success count alongside the error list.
pub fn generate_letter_batch(jobs: &[LetterJob], config: &LetterConfig) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for job in jobs {
        match generate_letter_pdf(
            &job.body_html,
            &job.recipient,
            job.personalized_intro.as_deref(),
            config,
        ) {
            Ok(bytes) => {
                outcome
                    .generated
                    .push((letter_filename(&job.recipient), bytes));
            }
            Err(e) => {
                log::warn!("letter for token '{}' failed: {e}", job.recipient.token);
                outcome
                    .errors
                    .push(format!("{}: {e}", job.recipient.full_name()));
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates;

    fn test_recipient() -> Recipient {
        Recipient {
            token: "testtoken".into(),
            first_name: Some("Erika".into()),
            last_name: Some("Musterfrau".into()),
            company: Some("Musterfirma GmbH".into()),
            anrede: Some("frau".into()),
            ..Recipient::default()
        }
    }

    #[test]
    fn pipeline_basic() {
        let config = LetterConfig::default();
        let bytes = generate_letter_pdf(
            templates::minimal_template(),
            &test_recipient(),
            None,
            &config,
        )
        .unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn batch_continues_past_failures() {
        let config = LetterConfig::default();
        let good = LetterJob {
            recipient: test_recipient(),
            body_html: templates::minimal_template().to_string(),
            personalized_intro: None,
        };
        // A token long enough that no QR version can hold the URL.
        let bad = LetterJob {
            recipient: Recipient {
                token: "x".repeat(8000),
                last_name: Some("Kaputt".into()),
                ..Recipient::default()
            },
            body_html: templates::minimal_template().to_string(),
            personalized_intro: None,
        };
        let outcome = generate_letter_batch(&[good, bad], &config);
        assert_eq!(outcome.generated.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("Kaputt:"));
    }
}
