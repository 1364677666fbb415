#![forbid(unsafe_code)]
//! Localization string resolver.
//!
//! Merges JSON entry documents contributed by many content sources into one
//! table of localized strings for a given platform and app version, and
//! computes which strings changed between two revisions of those documents.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use string_resolver::{EntryDocument, EntryMerger, Platform, change_detail, compute_changes};
//! use string_resolver::traits::Parser;
//!
//! let documents = vec![EntryDocument::read_from("content/home.json")?];
//!
//! // Build the resolved table for an iOS 2.1.0 build
//! let mut merger = EntryMerger::new(Platform::Ios, "2.1.0", None)?;
//! merger.add_entries(&documents)?;
//! let tables = merger.localize(&["en", "en-AU"], "en")?;
//!
//! // Or find what changed for that build between two content revisions
//! let previous = vec![EntryDocument::read_from("previous/home.json")?];
//! let changes = compute_changes(&change_detail(&previous, &documents), Platform::Ios, "2.1.0")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Document rules
//!
//! - Documents for another platform are skipped; `all` or no platform applies everywhere.
//! - Value variants carry optional `iosSemver` / `androidSemver` gates.
//! - A `(key, language)` pair may be defined by only one document; anything
//!   else fails the merge.

pub mod changes;
pub mod error;
pub mod localize;
pub mod merger;
pub mod traits;
pub mod types;
pub mod version;

// Re-export most used types for easy consumption
pub use crate::{
    changes::{ChangeComputer, ChangeMap, ChangeSet, KeyChange, change_detail, compute_changes},
    error::Error,
    localize::{AccessorDescriptor, LocalizedRow, LocalizedTable},
    merger::EntryMerger,
    types::{
        DocumentEntry, EntryDocument, EntryKind, Platform, PlatformScope, PluralCategory,
        ResolvedKeyEntry, ResolvedValue, ValuePayload, ValueVariant,
    },
};
