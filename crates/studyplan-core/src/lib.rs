//! Core logic for the study plan service.
//!
//! Everything here is pure: the generator takes its notion of "now" from a
//! [`clock::Clock`] and the catalog is embedded at compile time. The HTTP
//! boundary and CLI live in `studyplan-cli`.

pub mod catalog;
pub mod clock;
pub mod plan;
