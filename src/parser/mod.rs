//! Parsing: mail messages (MIME) and note frontmatter.

pub mod frontmatter;
pub mod mime;
