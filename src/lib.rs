#![allow(clippy::enum_variant_names, clippy::module_inception)]

//! Renders folder trees into text listings through line templates, replays
//! saved listings into the same records and compares two listings as a
//! stream of additions, deletions, changes and matches.

pub mod application;
pub mod cli;
pub mod compare;
pub mod config;
pub mod ext;
pub mod filesystem;
pub mod format;
pub mod lister;
