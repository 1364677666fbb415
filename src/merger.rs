//! The `EntryMerger` accumulates entry documents into a resolved table for one
//! platform and app version.
//!
//! Documents for another platform are ignored, value variants whose version
//! gate excludes the app version are skipped, and any `(key, language)` slot
//! filled twice fails the merge.

use std::collections::{BTreeMap, HashMap};

use semver::Version;

use crate::{
    error::Error,
    types::{EntryDocument, Platform, ResolvedKeyEntry, ResolvedValue, ValuePayload},
    version::{VersionRange, clean_version},
};

/// Merges entry documents into a table of resolved keys.
///
/// # Example
///
/// ```rust
/// use string_resolver::{EntryMerger, Platform, traits::Parser, EntryDocument};
///
/// let document = EntryDocument::from_str(r#"{
///     "title": "Home",
///     "lang": "en",
///     "entries": [{ "key": "hello", "type": "string", "values": [{ "value": "Hello" }] }]
/// }"#)?;
///
/// let mut merger = EntryMerger::new(Platform::Ios, "1.2.3", None)?;
/// merger.add_entry(&document)?;
/// assert_eq!(merger.get_all_values_for_string("hello").unwrap()["en"].as_text(), Some("Hello"));
/// # Ok::<(), string_resolver::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EntryMerger {
    platform: Platform,
    version: Version,
    source_id: Option<String>,
    entries: Vec<ResolvedKeyEntry>,
    /// Original (unprefixed) key -> position in `entries`.
    index: HashMap<String, usize>,
}

impl EntryMerger {
    /// Creates an empty merger for `platform` at app `version`.
    ///
    /// The version is cleaned before parsing; an invalid version is a
    /// validation error.
    pub fn new(platform: Platform, version: &str, source_id: Option<String>) -> Result<Self, Error> {
        let version = clean_version(version)?;
        Ok(Self {
            platform,
            version,
            source_id,
            entries: Vec::new(),
            index: HashMap::new(),
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Opaque provenance identifier handed through to output collaborators.
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    /// Adds every applicable value of `document` to the table.
    ///
    /// # Errors
    ///
    /// - [`Error::Conflict`] when another document already supplied a value for
    ///   the same key and language.
    /// - [`Error::DuplicateKey`] when the same document supplies it twice.
    /// - [`Error::TypeMismatch`] when a value does not have the shape its
    ///   entry type requires.
    /// - [`Error::InvalidVersionRange`] when a relevant version gate cannot be
    ///   parsed.
    pub fn add_entry(&mut self, document: &EntryDocument) -> Result<(), Error> {
        if !document.scope().includes(self.platform) {
            tracing::debug!(
                title = %document.title,
                document_platform = %document.scope(),
                platform = %self.platform,
                "skipping document for another platform"
            );
            return Ok(());
        }

        for entry in &document.entries {
            let final_key = document.final_key(&entry.key);

            for variant in &entry.values {
                if let Some(range) = variant.range_for(self.platform) {
                    let range = VersionRange::parse(range)?;
                    if !range.matches(&self.version) {
                        tracing::debug!(
                            key = %final_key,
                            lang = %document.lang,
                            range = %range,
                            version = %self.version,
                            "value is gated out for this version"
                        );
                        continue;
                    }
                }

                if !entry.kind.accepts(&variant.value) {
                    return Err(Error::TypeMismatch {
                        key: final_key,
                        expected: entry.kind.to_string(),
                        title: document.title.clone(),
                    });
                }

                let position = match self.index.get(&entry.key) {
                    Some(position) => *position,
                    None => {
                        self.entries.push(ResolvedKeyEntry {
                            key: final_key.clone(),
                            kind: entry.kind.clone(),
                            do_not_translate: entry.do_not_translate.unwrap_or(false),
                            values: BTreeMap::new(),
                        });
                        let position = self.entries.len() - 1;
                        self.index.insert(entry.key.clone(), position);
                        position
                    }
                };

                let resolved = &mut self.entries[position];
                if let Some(existing) = resolved.values.get(&document.lang) {
                    return Err(if existing.title == document.title {
                        Error::DuplicateKey {
                            key: final_key,
                            language: document.lang.clone(),
                            title: document.title.clone(),
                        }
                    } else {
                        Error::Conflict {
                            key: final_key,
                            language: document.lang.clone(),
                            title: document.title.clone(),
                            existing_title: existing.title.clone(),
                        }
                    });
                }

                resolved.values.insert(
                    document.lang.clone(),
                    ResolvedValue {
                        title: document.title.clone(),
                        value: variant.value.clone(),
                        description: entry.description.clone(),
                    },
                );
            }
        }

        Ok(())
    }

    /// Adds each document in order, stopping at the first error.
    pub fn add_entries<'a, I>(&mut self, documents: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a EntryDocument>,
    {
        for document in documents {
            self.add_entry(document)?;
        }
        tracing::info!(
            platform = %self.platform,
            version = %self.version,
            keys = self.entries.len(),
            "merged entry documents"
        );
        Ok(())
    }

    /// Returns language -> value for `key`, or `None` if the key was never added.
    pub fn get_all_values_for_string(&self, key: &str) -> Option<BTreeMap<String, ValuePayload>> {
        self.get(key).map(|entry| {
            entry
                .values
                .iter()
                .map(|(lang, resolved)| (lang.clone(), resolved.value.clone()))
                .collect()
        })
    }

    /// Looks up a resolved entry by its original, unprefixed key.
    pub fn get(&self, key: &str) -> Option<&ResolvedKeyEntry> {
        self.index.get(key).map(|position| &self.entries[*position])
    }

    /// Resolved entries in the order their keys were first encountered.
    pub fn entries(&self) -> &[ResolvedKeyEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedKeyEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a EntryMerger {
    type Item = &'a ResolvedKeyEntry;
    type IntoIter = std::slice::Iter<'a, ResolvedKeyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
