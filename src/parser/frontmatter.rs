//! Flat `key: value` frontmatter at the top of a note.
//!
//! Only the subset needed to find a `created` date is understood: no nesting,
//! no lists, no quoting. A value is everything after the first colon, trimmed.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Key holding the creation date.
pub const CREATED_KEY: &str = "created";

/// Key/value pairs from a note header. Later duplicates win.
pub type Frontmatter = BTreeMap<String, String>;

/// Return the lines between the opening and closing `---`, or `None` if the
/// note does not start with a complete block.
pub fn extract_block(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some(&content[start..offset]);
        }
        offset += line.len();
    }
    None
}

/// Parse a header block into key/value pairs. Lines without a colon are ignored.
pub fn parse_block(block: &str) -> Frontmatter {
    block
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Extract and parse the frontmatter of a note.
pub fn parse(content: &str) -> Option<Frontmatter> {
    extract_block(content).map(parse_block)
}

/// Normalize a `created` value to `YYYY-MM-DD`.
///
/// Accepts `YYYY-MM-DD` with optional trailing characters (a time, usually)
/// and `DD.MM.YYYY`, likewise. Anything else, including impossible dates,
/// yields `None`.
pub fn normalize_date(value: &str) -> Option<String> {
    let head = value.trim().get(..10)?;
    let date = NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%d.%m.%Y"))
        .ok()?;
    Some(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_block() {
        let note = "---\ncreated: 2023-08-20\ntags: x\n---\n# Title\n";
        assert_eq!(extract_block(note), Some("created: 2023-08-20\ntags: x\n"));
    }

    #[test]
    fn test_extract_block_crlf() {
        let note = "---\r\ncreated: 2023-08-20\r\n---\r\nBody";
        let fm = parse(note).unwrap();
        assert_eq!(fm.get(CREATED_KEY).map(String::as_str), Some("2023-08-20"));
    }

    #[test]
    fn test_extract_block_requires_leading_delimiter() {
        assert_eq!(extract_block("# Title\n---\ncreated: x\n---\n"), None);
        assert_eq!(extract_block(""), None);
    }

    #[test]
    fn test_extract_block_requires_closing_delimiter() {
        assert_eq!(extract_block("---\ncreated: 2023-08-20\n"), None);
    }

    #[test]
    fn test_empty_block() {
        let fm = parse("---\n---\nBody").unwrap();
        assert!(fm.is_empty());
    }

    #[test]
    fn test_value_is_everything_after_first_colon() {
        let fm = parse_block("created: 2023-08-20 14:30\nurl: https://x.org\nnot a pair\n");
        assert_eq!(fm["created"], "2023-08-20 14:30");
        assert_eq!(fm["url"], "https://x.org");
        assert_eq!(fm.len(), 2);
    }

    #[test]
    fn test_normalize_both_formats_agree() {
        assert_eq!(normalize_date("2023-08-20").as_deref(), Some("2023-08-20"));
        assert_eq!(normalize_date("20.08.2023").as_deref(), Some("2023-08-20"));
        assert_eq!(
            normalize_date("2023-08-20T14:30:00").as_deref(),
            Some("2023-08-20")
        );
        assert_eq!(
            normalize_date("20.08.2023 14:30").as_deref(),
            Some("2023-08-20")
        );
    }

    #[test]
    fn test_normalize_rejects_other_formats() {
        assert_eq!(normalize_date("08/20/2023"), None);
        assert_eq!(normalize_date("yesterday"), None);
        assert_eq!(normalize_date("2023-02-30"), None);
        assert_eq!(normalize_date(""), None);
    }
}
