//! Recipient model and letter plumbing: salutation formatting, placeholder
//! substitution, and download filename generation.

use serde::{Deserialize, Serialize};

use crate::error::LetterError;

/// One letter recipient. All fields except the landing-page token are
/// optional; missing values substitute as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    /// Landing-page token, unique per recipient.
    pub token: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    /// Salutation code: "herr", "frau", or "dear" (case-insensitive).
    #[serde(default)]
    pub anrede: Option<String>,
}

impl Recipient {
    /// Parse a recipient from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, LetterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// "First Last" from the non-empty name parts, or "Unknown".
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            "Unknown".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Format the German salutation line for an Anrede code. Unrecognized or
/// absent codes yield an empty string.
pub fn format_anrede(anrede: Option<&str>, first_name: &str, last_name: &str) -> String {
    let code = anrede.map(|s| s.to_ascii_lowercase());
    match code.as_deref() {
        Some("herr") => format!("Sehr geehrter Herr {last_name},"),
        Some("frau") => format!("Sehr geehrte Frau {last_name},"),
        Some("dear") => format!("Dear {first_name},"),
        _ => String::new(),
    }
}

/// Substitute recipient placeholders in the letter template. A pure string
/// rewrite that must complete before the markup parser sees the text; the
/// `{{qr_code}}` placeholder is left in place for the parser.
pub fn substitute_placeholders(
    text: &str,
    recipient: &Recipient,
    personalized_intro: Option<&str>,
) -> String {
    let first = recipient.first_name.as_deref().unwrap_or("");
    let last = recipient.last_name.as_deref().unwrap_or("");
    let anrede = format_anrede(recipient.anrede.as_deref(), first, last);

    text.replace("{{first_name}}", first)
        .replace("{{last_name}}", last)
        .replace("{{full_name}}", &recipient.full_name())
        .replace("{{company}}", recipient.company.as_deref().unwrap_or(""))
        .replace("{{industry}}", recipient.industry.as_deref().unwrap_or(""))
        .replace("{{anrede}}", &anrede)
        .replace(
            "{{personalized_intro}}",
            personalized_intro.unwrap_or(""),
        )
}

/// Sanitize one filename component: anything outside alphanumerics, German
/// diacritics, `_`, and `-` collapses to a single underscore; leading and
/// trailing underscores are trimmed.
pub fn sanitize_filename(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric()
                || matches!(c, 'ä' | 'ö' | 'ü' | 'Ä' | 'Ö' | 'Ü' | 'ß' | '_' | '-')
            {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut out = String::with_capacity(mapped.len());
    for c in mapped.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

/// Suggested download filename: `<LastName>_<Company>_<token>.pdf`.
pub fn letter_filename(recipient: &Recipient) -> String {
    let last = recipient
        .last_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown");
    let company = recipient
        .company
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("Company");
    format!(
        "{}_{}_{}.pdf",
        sanitize_filename(last),
        sanitize_filename(company),
        recipient.token
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> Recipient {
        Recipient {
            token: "mueller-gmbh".into(),
            first_name: Some("Hans".into()),
            last_name: Some("M\u{00fc}ller".into()),
            company: Some("M\u{00fc}ller & S\u{00f6}hne GmbH".into()),
            industry: Some("Handwerk".into()),
            anrede: Some("Herr".into()),
            ..Recipient::default()
        }
    }

    #[test]
    fn anrede_codes() {
        assert_eq!(
            format_anrede(Some("herr"), "Hans", "M\u{00fc}ller"),
            "Sehr geehrter Herr M\u{00fc}ller,"
        );
        assert_eq!(
            format_anrede(Some("FRAU"), "Anna", "Schmidt"),
            "Sehr geehrte Frau Schmidt,"
        );
        assert_eq!(format_anrede(Some("dear"), "Jane", "Doe"), "Dear Jane,");
        assert_eq!(format_anrede(Some("divers"), "A", "B"), "");
        assert_eq!(format_anrede(None, "A", "B"), "");
    }

    #[test]
    fn placeholders_are_substituted() {
        let out = substitute_placeholders(
            "<p>{{anrede}}</p><p>{{personalized_intro}} Gr\u{00fc}\u{00df}e an {{company}} ({{industry}}), {{full_name}}!</p>",
            &recipient(),
            Some("Ihr Dach fiel uns auf."),
        );
        assert!(out.contains("Sehr geehrter Herr M\u{00fc}ller,"));
        assert!(out.contains("Ihr Dach fiel uns auf."));
        assert!(out.contains("M\u{00fc}ller & S\u{00f6}hne GmbH (Handwerk), Hans M\u{00fc}ller!"));
    }

    #[test]
    fn missing_fields_substitute_empty() {
        let r = Recipient {
            token: "t".into(),
            ..Recipient::default()
        };
        let out = substitute_placeholders("[{{anrede}}][{{company}}][{{first_name}}]", &r, None);
        assert_eq!(out, "[][][]");
        assert_eq!(r.full_name(), "Unknown");
    }

    #[test]
    fn qr_placeholder_is_untouched() {
        let out = substitute_placeholders("{{qr_code}}", &recipient(), None);
        assert_eq!(out, "{{qr_code}}");
    }

    #[test]
    fn filename_is_sanitized() {
        assert_eq!(
            letter_filename(&recipient()),
            "M\u{00fc}ller_M\u{00fc}ller_S\u{00f6}hne_GmbH_mueller-gmbh.pdf"
        );
    }

    #[test]
    fn sanitize_collapses_and_trims() {
        assert_eq!(sanitize_filename("  a/b\\c  "), "a_b_c");
        assert_eq!(sanitize_filename("__x__"), "x");
        assert_eq!(sanitize_filename("Gro\u{00df}e B\u{00e4}ckerei"), "Gro\u{00df}e_B\u{00e4}ckerei");
    }

    #[test]
    fn recipient_roundtrips_through_json() {
        let r = recipient();
        let json = serde_json::to_string(&r).unwrap();
        let back = Recipient::from_json(&json).unwrap();
        assert_eq!(r, back);
    }

    #[test]
    fn invalid_recipient_json_is_a_json_error() {
        let err = Recipient::from_json("{not json").unwrap_err();
        assert!(matches!(err, LetterError::Json(_)));
    }
}
