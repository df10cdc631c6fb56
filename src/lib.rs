//! Shadcn Studio core
//!
//! This crate re-exports the theme data model and the file patch/apply
//! engine so callers (the CLI front end, the web workspace) can depend on
//! a single facade.

pub use studio_patch as patch;
pub use studio_theme as theme;
