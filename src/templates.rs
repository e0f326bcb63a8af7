//! Sample letter templates for testing and demonstration.
//!
//! Each template exercises different parts of the markup subset and the
//! recipient placeholders.

/// Full letter: salutation, personalized intro, emphasis, bullet list,
/// inline QR marker, closing signature, and a postscript.
pub fn default_letter_template() -> &'static str {
    r#"<p>{{anrede}}</p>
<p>{{personalized_intro}}</p>
<p>viele Betriebe aus dem Bereich {{industry}} verlieren Aufträge, weil Interessenten sie online nicht finden. Für {{company}} haben wir deshalb eine kurze, <strong>persönliche</strong> Videovorstellung vorbereitet.</p>
<p>Was Sie darin erwartet:</p>
<ul>
<li>Eine Analyse Ihres aktuellen Online-Auftritts</li>
<li><strong>Drei konkrete Maßnahmen</strong> mit dem größten Hebel</li>
<li>Eine <em>unverbindliche</em> Einschätzung der Kosten</li>
</ul>
<p>Scannen Sie einfach den QR-Code &ndash; das Video dauert keine drei Minuten:</p>
<p>{{qr_code}}</p>
<p>Mit freundlichen Grüßen<br/>Max Mustermann</p>
<p>P.S. Der Link ist nur für Sie bestimmt und läuft nicht ab. Schauen Sie einfach, wann es Ihnen passt.</p>"#
}

/// Letter without an inline QR marker; the renderer falls back to the
/// bottom-right corner placement.
pub fn no_inline_qr_template() -> &'static str {
    r#"<p>{{anrede}}</p>
<p>wir haben für {{company}} eine kurze Videovorstellung vorbereitet. Den Zugang finden Sie über den QR-Code unten rechts auf dieser Seite.</p>
<p>Herzliche Grüße<br/>Max Mustermann</p>"#
}

/// Minimal template for unit testing.
pub fn minimal_template() -> &'static str {
    "<p>Hallo Welt.</p>"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{parse_to_blocks, Block};

    #[test]
    fn templates_parse_to_blocks() {
        for (name, html) in [
            ("default", default_letter_template()),
            ("no_inline_qr", no_inline_qr_template()),
            ("minimal", minimal_template()),
        ] {
            let blocks = parse_to_blocks(html);
            assert!(
                !blocks.is_empty(),
                "template '{name}' should parse to non-empty blocks"
            );
        }
    }

    #[test]
    fn default_template_has_inline_qr_marker() {
        let blocks = parse_to_blocks(default_letter_template());
        assert!(blocks.contains(&Block::QrCode));
    }

    #[test]
    fn fallback_template_has_no_marker() {
        let blocks = parse_to_blocks(no_inline_qr_template());
        assert!(!blocks.contains(&Block::QrCode));
    }
}
