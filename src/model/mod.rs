//! Core data model: intake items, parsed mail, relocations and note drafts.

pub mod item;
pub mod mail;
pub mod note;
