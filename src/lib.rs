//! `notedrop`: turn files and emails dropped into an input folder into
//! linked markdown notes.
//!
//! This crate provides the import pipeline (scan, parse `.eml`, relocate
//! attachments, render a template, write the note) and the rename-by-date
//! routine, both running against an abstract [`vault::Vault`].

pub mod config;
pub mod error;
pub mod i18n;
pub mod intake;
pub mod model;
pub mod notify;
pub mod parser;
pub mod rename;
pub mod template;
pub mod vault;
