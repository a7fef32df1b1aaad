//! MIME message parsing: subject, plain-text body and decoded attachments.

use mail_parser::{MessageParser, MessagePart, MimeHeaders, PartType};

use crate::error::{NotedropError, Result};
use crate::model::mail::{MailAttachment, ParsedMail, NO_SUBJECT};

/// Parse a complete raw message (headers + body) read from `path`.
///
/// The body prefers the `text/plain` part and falls back to the HTML part
/// converted to plain text. Every attachment is returned, including ones
/// without an extension; filtering is up to the caller.
pub fn parse_mail(raw_message: &[u8], path: &str) -> Result<ParsedMail> {
    let message_bytes = skip_from_line(raw_message);
    if message_bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(NotedropError::MailParse(path.to_string()));
    }

    let msg = MessageParser::default()
        .parse(message_bytes)
        .ok_or_else(|| NotedropError::MailParse(path.to_string()))?;

    let subject = msg
        .subject()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUBJECT)
        .to_string();

    // HTML-only mails list their HTML part as the first text part.
    let body = msg
        .text_part(0)
        .or_else(|| msg.html_part(0))
        .and_then(part_text)
        .unwrap_or_default();

    let attachments = msg
        .attachments()
        .enumerate()
        .map(|(idx, part)| MailAttachment {
            filename: part
                .attachment_name()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("attachment_{idx}")),
            content: part.contents().to_vec(),
        })
        .collect();

    Ok(ParsedMail {
        subject,
        body,
        attachments,
    })
}

/// Plain text of a body part, converting HTML ourselves.
fn part_text(part: &MessagePart) -> Option<String> {
    match &part.body {
        PartType::Text(text) => Some(text.trim().to_string()),
        PartType::Html(html) => Some(html_to_text(html)),
        _ => None,
    }
}

/// Skip a byte-order mark and an MBOX `From ` separator line, which some
/// mail clients leave at the top of exported `.eml` files.
fn skip_from_line(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}

/// Convert HTML to plain text for a note body.
///
/// - Block elements and `<br>` become line breaks
/// - Scripts and styles are removed
/// - Common HTML entities are decoded
/// - Runs of blank lines collapse into one
pub fn html_to_text(html: &str) -> String {
    let mut text = remove_tag_block(html, "script");
    text = remove_tag_block(&text, "style");

    for tag in ["br", "br/", "br /"] {
        text = text.replace(&format!("<{tag}>"), "\n");
        text = text.replace(&format!("<{}>", tag.to_uppercase()), "\n");
    }
    for tag in ["p", "div", "tr", "li", "h1", "h2", "h3", "h4", "h5", "h6"] {
        let upper = tag.to_uppercase();
        text = text.replace(&format!("<{tag}>"), "\n");
        text = text.replace(&format!("<{tag} "), "\n<");
        text = text.replace(&format!("<{upper}>"), "\n");
        text = text.replace(&format!("</{tag}>"), "\n");
        text = text.replace(&format!("</{upper}>"), "\n");
    }

    let mut stripped = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }

    // `&amp;` last, so `&amp;lt;` stays literal.
    for (entity, ch) in [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&apos;", "'"),
        ("&nbsp;", " "),
        ("&#160;", " "),
        ("&amp;", "&"),
    ] {
        stripped = stripped.replace(entity, ch);
    }

    let mut prev_was_blank = false;
    let mut cleaned = String::with_capacity(stripped.len());
    for line in stripped.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !prev_was_blank {
                cleaned.push('\n');
                prev_was_blank = true;
            }
        } else {
            cleaned.push_str(trimmed);
            cleaned.push('\n');
            prev_was_blank = false;
        }
    }

    cleaned.trim().to_string()
}

/// Remove an entire tag block (e.g. `<script>…</script>`).
fn remove_tag_block(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut remaining = html;
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    // ASCII lowercasing keeps byte offsets aligned with the original.
    while let Some(start) = remaining.to_ascii_lowercase().find(&open) {
        result.push_str(&remaining[..start]);
        let after = &remaining[start..];
        match after.to_ascii_lowercase().find(&close) {
            Some(end) => remaining = &after[end + close.len()..],
            None => {
                remaining = "";
                break;
            }
        }
    }
    result.push_str(remaining);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTIPART: &str = "From: Alice <alice@example.com>\r\n\
To: bob@example.com\r\n\
Subject: Hello\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"XYZ\"\r\n\
\r\n\
--XYZ\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
See attached.\r\n\
--XYZ\r\n\
Content-Type: application/pdf; name=\"a.pdf\"\r\n\
Content-Disposition: attachment; filename=\"a.pdf\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
JVBERi0xLjQK\r\n\
--XYZ\r\n\
Content-Type: application/octet-stream; name=\"b\"\r\n\
Content-Disposition: attachment; filename=\"b\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
AAEC\r\n\
--XYZ--\r\n";

    #[test]
    fn test_parse_multipart() {
        let mail = parse_mail(MULTIPART.as_bytes(), "_input/m.eml").unwrap();
        assert_eq!(mail.subject, "Hello");
        assert_eq!(mail.body, "See attached.");
        assert_eq!(mail.attachments.len(), 2);
        assert_eq!(mail.attachments[0].filename, "a.pdf");
        assert_eq!(mail.attachments[0].content, b"%PDF-1.4\n");
        assert_eq!(mail.attachments[1].filename, "b");
        assert_eq!(mail.attachments[1].content, vec![0u8, 1, 2]);
    }

    #[test]
    fn test_missing_subject_uses_placeholder() {
        let raw = b"From: a@example.com\r\n\r\nJust a body\r\n";
        let mail = parse_mail(raw, "x.eml").unwrap();
        assert_eq!(mail.subject, NO_SUBJECT);
        assert_eq!(mail.body, "Just a body");
        assert!(mail.attachments.is_empty());
    }

    #[test]
    fn test_html_only_body_is_converted() {
        let raw = b"Subject: Html\r\nContent-Type: text/html\r\n\r\n<p>Hello <b>world</b></p>";
        let mail = parse_mail(raw, "x.eml").unwrap();
        assert!(mail.body.contains("Hello world"), "got: {}", mail.body);
    }

    #[test]
    fn test_html_body_drops_styles_and_entities() {
        let raw = b"Subject: Html\r\nContent-Type: text/html\r\n\r\n\
<p>A &amp; B</p><style>x{}</style>";
        let mail = parse_mail(raw, "x.eml").unwrap();
        assert_eq!(mail.body, "A & B");
    }

    #[test]
    fn test_alternative_prefers_plain_text() {
        let raw = b"Subject: Alt\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/alternative; boundary=\"B\"\r\n\
\r\n\
--B\r\n\
Content-Type: text/plain\r\n\
\r\n\
Plain version\r\n\
--B\r\n\
Content-Type: text/html\r\n\
\r\n\
<p>Html version</p>\r\n\
--B--\r\n";
        let mail = parse_mail(raw, "x.eml").unwrap();
        assert_eq!(mail.body, "Plain version");
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        assert!(matches!(
            parse_mail(b"  \r\n", "_input/empty.eml"),
            Err(NotedropError::MailParse(ref p)) if p == "_input/empty.eml"
        ));
    }

    #[test]
    fn test_skip_from_line() {
        let data = b"From user@example.com Thu Jan 01 00:00:00 2024\nSubject: Test\n\nBody\n";
        assert!(skip_from_line(data).starts_with(b"Subject:"));
        let bom = b"\xEF\xBB\xBFSubject: Test\n\nBody\n";
        assert!(skip_from_line(bom).starts_with(b"Subject:"));
    }

    #[test]
    fn test_html_to_text_entities() {
        assert_eq!(html_to_text("Tom &amp; Jerry &lt;3&gt;"), "Tom & Jerry <3>");
    }

    #[test]
    fn test_html_to_text_removes_scripts() {
        assert_eq!(
            html_to_text("Before<script>alert('x')</script>After"),
            "BeforeAfter"
        );
    }
}
