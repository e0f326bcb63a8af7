//! Markup parser – converts the constrained letter HTML into semantic blocks.
//!
//! We support a controlled subset of markup:
//! - Structural: `<p>`, `<br>`, `<ul>`/`<li>`
//! - Inline emphasis: `<strong>`/`<b>`, `<em>`/`<i>`
//! - The `{{qr_code}}` placeholder, consumed structurally as an image marker
//!
//! Any other tag is stripped. Malformed markup degrades to best-effort text
//! extraction rather than failing.

/// Placeholder token that marks where the QR code is drawn in the text flow.
pub const QR_PLACEHOLDER: &str = "{{qr_code}}";

/// A maximal run of characters sharing one bold/italic combination.
/// Entities are already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

/// One semantic unit of parsed letter content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph or list item with styled spans.
    Text { spans: Vec<TextSpan>, bullet: bool },
    /// Marker for the inline QR code placement.
    QrCode,
}

impl Block {
    fn text(spans: Vec<TextSpan>, bullet: bool) -> Option<Self> {
        if spans.is_empty() {
            None
        } else {
            Some(Block::Text { spans, bullet })
        }
    }
}

/// Parse a letter HTML string into an ordered block sequence.
///
/// `<br>` variants become newlines, `<p>` boundaries split paragraphs, `<ul>`
/// segments decompose into per-`<li>` bullet blocks, and a `{{qr_code}}`
/// placeholder splits its paragraph around a [`Block::QrCode`] marker.
/// Empty or whitespace-only segments produce no block.
pub fn parse_to_blocks(html: &str) -> Vec<Block> {
    let normalized = normalize_breaks(html);
    let mut blocks = Vec::new();

    for segment in split_paragraphs(&normalized) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if find_ci(segment, "<ul").is_some() {
            push_list_segment(segment, &mut blocks);
        } else {
            push_text_segment(segment, &mut blocks);
        }
    }

    blocks
}

/// Parse inline formatting from a text segment into spans.
///
/// A linear scan toggles the bold/italic state on emphasis tag boundaries and
/// flushes the accumulated text whenever the state changes. Other tags are
/// stripped. Never returns an empty list for non-empty input: if no span was
/// produced, the tag-stripped text becomes one plain span.
pub fn parse_inline_formatting(html: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut bold = false;
    let mut italic = false;
    let mut current = String::new();

    let bytes = html.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some(end) = tag_end(bytes, i) {
                let inner = html[i + 1..end].trim();
                let closing = inner.starts_with('/');
                match tag_name(inner).to_ascii_lowercase().as_str() {
                    "strong" | "b" => {
                        flush_span(&mut spans, &mut current, bold, italic);
                        bold = !closing;
                    }
                    "em" | "i" => {
                        flush_span(&mut spans, &mut current, bold, italic);
                        italic = !closing;
                    }
                    // Residual tags are stripped, not treated as style carriers.
                    _ => {}
                }
                i = end + 1;
                continue;
            }
        }
        // A lone '<' with no closing '>' falls through as literal text.
        let ch = html[i..].chars().next().unwrap();
        current.push(ch);
        i += ch.len_utf8();
    }
    flush_span(&mut spans, &mut current, bold, italic);

    if spans.is_empty() {
        let plain = decode_entities(&strip_tags(html));
        if !plain.is_empty() {
            log::warn!(
                "no inline spans parsed, falling back to tag-stripped text ({} chars)",
                plain.chars().count()
            );
            spans.push(TextSpan::plain(plain));
        }
    }

    spans
}

/// Decode the HTML entities that letter templates are allowed to contain.
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}")
}

// ---------------------------------------------------------------------------
// Segment handling
// ---------------------------------------------------------------------------

/// Replace `<br>` variants with newlines and drop carriage returns.
fn normalize_breaks(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let bytes = html.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some(end) = tag_end(bytes, i) {
                if tag_name(html[i + 1..end].trim()).eq_ignore_ascii_case("br") {
                    out.push('\n');
                    i = end + 1;
                    continue;
                }
            }
        }
        let ch = html[i..].chars().next().unwrap();
        if ch != '\r' {
            out.push(ch);
        }
        i += ch.len_utf8();
    }
    out
}

/// Split the document on `<p>`/`</p>` boundaries. The tags themselves are
/// discarded; everything between consecutive boundaries is one segment.
fn split_paragraphs(html: &str) -> Vec<&str> {
    let bytes = html.as_bytes();
    let mut segments = Vec::new();
    let mut seg_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some(end) = tag_end(bytes, i) {
                if tag_name(html[i + 1..end].trim()).eq_ignore_ascii_case("p") {
                    segments.push(&html[seg_start..i]);
                    seg_start = end + 1;
                }
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    segments.push(&html[seg_start..]);
    segments
}

/// Decompose a segment containing a `<ul>` list: optional leading text, one
/// bullet block per `<li>`, optional trailing text after `</ul>`.
fn push_list_segment(segment: &str, blocks: &mut Vec<Block>) {
    if let Some(ul_open) = find_ci(segment, "<ul") {
        let before = segment[..ul_open].trim();
        if !before.is_empty() {
            blocks.extend(Block::text(parse_inline_formatting(before), false));
        }
    }

    let mut rest = segment;
    while let Some(li_start) = find_ci(rest, "<li") {
        let after_tag = &rest[li_start..];
        let Some(open_len) = after_tag.find('>') else {
            log::warn!("unterminated <li> tag, dropping list remainder");
            break;
        };
        let content_start = li_start + open_len + 1;
        let content_end = find_ci(&rest[content_start..], "</li")
            .map(|off| content_start + off)
            .unwrap_or(rest.len());
        let item = rest[content_start..content_end].trim();
        if !item.is_empty() {
            blocks.extend(Block::text(parse_inline_formatting(item), true));
        }
        rest = &rest[content_end..];
        // Step past the closing tag so the next search starts after it.
        match rest.find('>') {
            Some(gt) => rest = &rest[gt + 1..],
            None => break,
        }
    }

    if let Some(ul_close) = rfind_ci(segment, "</ul") {
        let tail_start = segment[ul_close..]
            .find('>')
            .map(|gt| ul_close + gt + 1)
            .unwrap_or(segment.len());
        let after = segment[tail_start..].trim();
        if !after.is_empty() {
            blocks.extend(Block::text(parse_inline_formatting(after), false));
        }
    }
}

/// Push a plain text segment, splitting around a `{{qr_code}}` placeholder
/// when present.
fn push_text_segment(segment: &str, blocks: &mut Vec<Block>) {
    if segment == QR_PLACEHOLDER {
        blocks.push(Block::QrCode);
        return;
    }
    if let Some(idx) = segment.find(QR_PLACEHOLDER) {
        let before = segment[..idx].trim();
        let after = segment[idx + QR_PLACEHOLDER.len()..].trim();
        if !before.is_empty() {
            blocks.extend(Block::text(parse_inline_formatting(before), false));
        }
        blocks.push(Block::QrCode);
        if !after.is_empty() {
            blocks.extend(Block::text(parse_inline_formatting(after), false));
        }
        return;
    }
    blocks.extend(Block::text(parse_inline_formatting(segment), false));
}

// ---------------------------------------------------------------------------
// Scanning helpers
// ---------------------------------------------------------------------------

/// Byte index of the `>` closing a tag that starts at `start` (a `<`).
fn tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    bytes[start..]
        .iter()
        .position(|&b| b == b'>')
        .map(|off| start + off)
}

/// Tag name of a tag's raw inner text, without the `/` prefix or attributes.
fn tag_name(inner: &str) -> &str {
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    let end = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    &inner[..end]
}

fn flush_span(spans: &mut Vec<TextSpan>, current: &mut String, bold: bool, italic: bool) {
    if current.is_empty() {
        return;
    }
    spans.push(TextSpan {
        text: decode_entities(current),
        bold,
        italic,
    });
    current.clear();
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let bytes = html.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some(end) = tag_end(bytes, i) {
                i = end + 1;
                continue;
            }
        }
        let ch = html[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

/// ASCII case-insensitive substring search. The needle must be ASCII, which
/// guarantees the returned index lies on a char boundary.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

fn rfind_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len())
        .rev()
        .find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(block: &Block) -> String {
        match block {
            Block::Text { spans, .. } => spans.iter().map(|s| s.text.as_str()).collect(),
            Block::QrCode => panic!("expected text block"),
        }
    }

    #[test]
    fn plain_paragraph() {
        let blocks = parse_to_blocks("<p>Hallo Welt.</p>");
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Text { spans, bullet } => {
                assert!(!bullet);
                assert_eq!(spans, &[TextSpan::plain("Hallo Welt.")]);
            }
            _ => panic!("expected text block"),
        }
    }

    #[test]
    fn bold_run_splits_into_three_spans() {
        let blocks = parse_to_blocks("<p>Das ist <strong>wichtig</strong>.</p>");
        assert_eq!(blocks.len(), 1);
        let Block::Text { spans, .. } = &blocks[0] else {
            panic!("expected text block");
        };
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0], TextSpan::plain("Das ist "));
        assert_eq!(
            spans[1],
            TextSpan {
                text: "wichtig".into(),
                bold: true,
                italic: false
            }
        );
        assert_eq!(spans[2], TextSpan::plain("."));
    }

    #[test]
    fn bullet_list_with_intro() {
        let blocks =
            parse_to_blocks("<p>Intro</p><ul><li>Punkt A</li><li>Punkt B</li></ul>");
        assert_eq!(blocks.len(), 3);
        assert_eq!(text_of(&blocks[0]), "Intro");
        for (i, expected) in ["Punkt A", "Punkt B"].iter().enumerate() {
            match &blocks[i + 1] {
                Block::Text { spans, bullet } => {
                    assert!(bullet, "list item must be flagged as bullet");
                    assert_eq!(spans[0].text, *expected);
                }
                _ => panic!("expected text block"),
            }
        }
    }

    #[test]
    fn trailing_text_after_list() {
        let blocks = parse_to_blocks("<p><ul><li>A</li></ul>Danach</p>");
        assert_eq!(blocks.len(), 2);
        assert_eq!(text_of(&blocks[1]), "Danach");
    }

    #[test]
    fn unterminated_list_item_is_dropped() {
        let blocks = parse_to_blocks("<ul><li>Punkt A</li><li Punkt B");
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Text { spans, bullet } => {
                assert!(bullet);
                assert_eq!(spans[0].text, "Punkt A");
            }
            _ => panic!("expected text block"),
        }
    }

    #[test]
    fn inline_qr_splits_paragraph() {
        let blocks = parse_to_blocks("<p>Vorher {{qr_code}} nachher</p>");
        assert_eq!(blocks.len(), 3);
        assert_eq!(text_of(&blocks[0]), "Vorher");
        assert_eq!(blocks[1], Block::QrCode);
        assert_eq!(text_of(&blocks[2]), "nachher");
    }

    #[test]
    fn lone_qr_placeholder() {
        let blocks = parse_to_blocks("<p>{{qr_code}}</p>");
        assert_eq!(blocks, vec![Block::QrCode]);
    }

    #[test]
    fn br_becomes_newline() {
        let blocks = parse_to_blocks("<p>Zeile eins<br/>Zeile zwei</p>");
        assert_eq!(text_of(&blocks[0]), "Zeile eins\nZeile zwei");
    }

    #[test]
    fn entities_are_decoded() {
        let blocks = parse_to_blocks("<p>Meier &amp; Sohn &ndash; seit 1900</p>");
        assert_eq!(text_of(&blocks[0]), "Meier & Sohn \u{2013} seit 1900");
    }

    #[test]
    fn unknown_tags_are_stripped() {
        let spans = parse_inline_formatting(r#"Hallo <span class="x">Welt</span>!"#);
        assert_eq!(spans, vec![TextSpan::plain("Hallo Welt!")]);
    }

    #[test]
    fn nested_emphasis_state() {
        let spans = parse_inline_formatting("<strong><em>beides</em></strong>");
        assert_eq!(spans.len(), 1);
        assert!(spans[0].bold && spans[0].italic);
    }

    #[test]
    fn empty_segments_are_dropped() {
        let blocks = parse_to_blocks("<p>  </p><p></p><p>Inhalt</p>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(text_of(&blocks[0]), "Inhalt");
    }

    #[test]
    fn span_concatenation_reconstructs_text() {
        let html = "Eins <b>zwei</b> drei <i>vier</i> f\u{00fc}nf";
        let spans = parse_inline_formatting(html);
        let joined: String = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "Eins zwei drei vier f\u{00fc}nf");
    }
}
