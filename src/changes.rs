//! Change detection between two revisions of the entry documents.
//!
//! [`change_detail`] finds every key whose raw definition changed anywhere,
//! independent of platform and version. [`compute_changes`] then replays those
//! keys through fresh [`EntryMerger`]s for one platform and version and keeps
//! only the keys whose resolved values actually differ there.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    error::Error,
    merger::EntryMerger,
    types::{
        DocumentEntry, EntryDocument, EntryKind, Platform, PlatformScope, ValuePayload,
        ValueVariant,
    },
    version::clean_version,
};

/// A value variant together with the entry metadata it was declared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedVariant {
    /// Title of the document that declared the variant.
    pub title: String,
    #[serde(flatten)]
    pub variant: ValueVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_translate: Option<bool>,
}

/// Every variant declared for one key: platform -> language -> type -> variants.
pub type KeyGrouping =
    BTreeMap<PlatformScope, BTreeMap<String, BTreeMap<EntryKind, Vec<GroupedVariant>>>>;

/// The raw definitions of a changed key before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyChange {
    /// `None` when the key did not exist in the base documents.
    pub before: Option<KeyGrouping>,
    pub after: KeyGrouping,
}

/// Changed keys (with base names applied) and their raw definitions.
pub type ChangeMap = BTreeMap<String, KeyChange>;

/// Resolved diff: key -> language -> new value.
pub type ChangeSet = BTreeMap<String, BTreeMap<String, ValuePayload>>;

/// Groups all variants of all documents by final key, platform, language and type.
///
/// No platform or version filtering happens here. Documents without a
/// platform are grouped under [`PlatformScope::All`].
pub fn group_documents(documents: &[EntryDocument]) -> BTreeMap<String, KeyGrouping> {
    let mut grouped: BTreeMap<String, KeyGrouping> = BTreeMap::new();
    for document in documents {
        for entry in &document.entries {
            let variants = grouped
                .entry(document.final_key(&entry.key))
                .or_default()
                .entry(document.scope())
                .or_default()
                .entry(document.lang.clone())
                .or_default()
                .entry(entry.kind.clone())
                .or_default();
            variants.extend(entry.values.iter().map(|variant| GroupedVariant {
                title: document.title.clone(),
                variant: variant.clone(),
                description: entry.description.clone(),
                do_not_translate: entry.do_not_translate,
            }));
        }
    }
    grouped
}

/// Collects the keys of `target` whose grouped definition differs from `base`.
///
/// Keys only present in `base` (removed keys) are not reported. Document
/// titles are not compared, so moving a key to another document is not a
/// change.
pub fn change_detail(base: &[EntryDocument], target: &[EntryDocument]) -> ChangeMap {
    let mut before = group_documents(base);
    let after = group_documents(target);

    after
        .into_iter()
        .filter_map(|(key, after)| {
            let before = before.remove(&key);
            if before
                .as_ref()
                .is_some_and(|before| same_definition(before, &after))
            {
                None
            } else {
                Some((key, KeyChange { before, after }))
            }
        })
        .collect()
}

/// Reduces `changes` to the keys whose resolved values differ for `platform`
/// at app `version`, mapped to their new values.
///
/// A key that no longer resolves at all on the target side is treated as a
/// removal and left out.
pub fn compute_changes(
    changes: &ChangeMap,
    platform: Platform,
    version: &str,
) -> Result<ChangeSet, Error> {
    let version = clean_version(version)?.to_string();
    let mut result = ChangeSet::new();

    for (key, change) in changes {
        let before = match &change.before {
            Some(grouping) => replay(key, grouping, platform, &version)?,
            None => None,
        };
        let after = replay(key, &change.after, platform, &version)?;

        if before == after {
            tracing::debug!(key = %key, platform = %platform, version = %version, "change is not visible");
            continue;
        }
        if let Some(after) = after {
            result.insert(key.clone(), after);
        }
    }

    tracing::info!(
        candidates = changes.len(),
        changed = result.len(),
        platform = %platform,
        version = %version,
        "computed resolved changes"
    );
    Ok(result)
}

/// Runs [`compute_changes`] for a fixed platform and version.
#[derive(Debug, Clone)]
pub struct ChangeComputer {
    platform: Platform,
    version: String,
}

impl ChangeComputer {
    /// Fails with a validation error if `version` is not a semantic version.
    pub fn new(platform: Platform, version: &str) -> Result<Self, Error> {
        let version = clean_version(version)?.to_string();
        Ok(Self { platform, version })
    }

    pub fn compute(&self, changes: &ChangeMap) -> Result<ChangeSet, Error> {
        compute_changes(changes, self.platform, &self.version)
    }
}

type Definition<'a> = (
    &'a PlatformScope,
    &'a str,
    &'a EntryKind,
    &'a ValueVariant,
    Option<&'a str>,
    Option<bool>,
);

fn definitions(grouping: &KeyGrouping) -> Vec<Definition<'_>> {
    grouping
        .iter()
        .flat_map(|(scope, languages)| {
            languages.iter().flat_map(move |(lang, kinds)| {
                kinds.iter().flat_map(move |(kind, variants)| {
                    variants.iter().map(move |grouped| {
                        (
                            scope,
                            lang.as_str(),
                            kind,
                            &grouped.variant,
                            grouped.description.as_deref(),
                            grouped.do_not_translate,
                        )
                    })
                })
            })
        })
        .collect()
}

// Equality of two groupings, ignoring which document declared each variant.
fn same_definition(before: &KeyGrouping, after: &KeyGrouping) -> bool {
    definitions(before) == definitions(after)
}

// Merges a single key's grouping in a fresh merger and returns its resolved values.
fn replay(
    key: &str,
    grouping: &KeyGrouping,
    platform: Platform,
    version: &str,
) -> Result<Option<BTreeMap<String, ValuePayload>>, Error> {
    let mut merger = EntryMerger::new(platform, version, None)?;
    for document in virtual_documents(key, grouping) {
        merger.add_entry(&document)?;
    }
    Ok(merger.get_all_values_for_string(key))
}

/// Rebuilds one single-key document per platform, language, type and source
/// title, so replay reports conflicts against the real document titles.
fn virtual_documents(key: &str, grouping: &KeyGrouping) -> Vec<EntryDocument> {
    let mut documents = Vec::new();
    for (scope, languages) in grouping {
        for (lang, kinds) in languages {
            for (kind, variants) in kinds {
                let mut by_title: Vec<(&str, Vec<DocumentEntry>)> = Vec::new();
                for grouped in variants {
                    let entry = DocumentEntry {
                        key: key.to_string(),
                        kind: kind.clone(),
                        description: grouped.description.clone(),
                        do_not_translate: grouped.do_not_translate,
                        values: vec![grouped.variant.clone()],
                    };
                    match by_title.iter_mut().find(|(title, _)| *title == grouped.title) {
                        Some((_, entries)) => entries.push(entry),
                        None => by_title.push((grouped.title.as_str(), vec![entry])),
                    }
                }

                documents.extend(by_title.into_iter().map(|(title, entries)| EntryDocument {
                    title: title.to_string(),
                    base_name: None,
                    lang: lang.clone(),
                    platform: Some(*scope),
                    entries,
                }));
            }
        }
    }
    documents
}
