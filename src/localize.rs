//! Per-culture projections of a resolved table.
//!
//! Output collaborators (strings-file writers, accessor code generators)
//! consume these instead of walking the merger directly, so base-culture
//! fallback and the missing-value check live in one place.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    merger::EntryMerger,
    types::{Platform, ResolvedValue, ValuePayload},
};

lazy_static! {
    // `%@` or a positional `%1$@` object placeholder.
    static ref IOS_TEMPLATE_REGEX: Regex = Regex::new(r"%(\d+\$)?@").unwrap();
}

/// One key of a localized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedRow {
    pub key: String,
    pub value: ValuePayload,
    /// Translator comment; omitted when it repeats the previous key's comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// All keys of a resolved table for a single culture, sorted case-insensitively.
///
/// Keys are ordered by their lowercase form compared code point by code
/// point, not by locale collation: `_x` sorts before `a` and `éclair` sorts
/// after `zebra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedTable {
    pub culture: String,
    pub is_base: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub rows: Vec<LocalizedRow>,
}

impl LocalizedTable {
    /// `Base` for the base culture, the culture code otherwise.
    pub fn file_stem(&self) -> &str {
        if self.is_base { "Base" } else { &self.culture }
    }

    pub fn get(&self, key: &str) -> Option<&LocalizedRow> {
        self.rows.iter().find(|row| row.key == key)
    }
}

/// What a code generator needs to emit a typed accessor for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorDescriptor {
    pub key: String,
    pub value: ValuePayload,
    /// Whether the value takes object arguments (iOS only).
    pub is_template: bool,
}

/// Checks that `culture` is a BCP 47 language identifier.
pub fn validate_culture(culture: &str) -> Result<(), Error> {
    culture
        .parse::<LanguageIdentifier>()
        .map(|_| ())
        .map_err(|_| {
            Error::validation_error(format!(
                "Invalid culture code `{}`. Expected a BCP 47 language identifier",
                culture
            ))
        })
}

impl EntryMerger {
    /// Builds one table per culture, falling back to `base_culture` for
    /// keys the culture does not define.
    ///
    /// # Errors
    ///
    /// [`Error::MissingBaseValue`] when a key has neither a value for the
    /// culture nor for the base culture; [`Error::Validation`] for an invalid
    /// culture code.
    pub fn localize<S: AsRef<str>>(
        &self,
        cultures: &[S],
        base_culture: &str,
    ) -> Result<Vec<LocalizedTable>, Error> {
        validate_culture(base_culture)?;

        let mut tables = Vec::with_capacity(cultures.len());
        for culture in cultures {
            let culture = culture.as_ref();
            validate_culture(culture)?;

            let mut rows = Vec::with_capacity(self.len());
            let mut last_comment: Option<String> = None;
            for entry in self.iter() {
                let culture_value = entry.values.get(culture);
                let base_value = entry.values.get(base_culture);
                let Some(owner) = culture_value.or(base_value) else {
                    return Err(Error::MissingBaseValue {
                        key: entry.key.clone(),
                        culture: base_culture.to_string(),
                    });
                };
                // An empty translation falls back to the base value.
                let source = culture_value
                    .filter(|resolved| !is_empty_text(&resolved.value))
                    .or(base_value)
                    .unwrap_or(owner);

                let comment = comment_for(culture_value, base_value, owner);
                let repeated = last_comment.as_deref() == Some(comment.as_str());
                rows.push(LocalizedRow {
                    key: entry.key.clone(),
                    value: source.value.clone(),
                    comment: if repeated { None } else { Some(comment.clone()) },
                });
                last_comment = Some(comment);
            }
            rows.sort_by_cached_key(|row| row.key.to_lowercase());

            tables.push(LocalizedTable {
                culture: culture.to_string(),
                is_base: culture == base_culture,
                source_id: self.source_id().map(str::to_string),
                rows,
            });
        }

        Ok(tables)
    }

    /// Describes every resolved key by its base-culture value.
    pub fn accessors(&self, base_culture: &str) -> Result<Vec<AccessorDescriptor>, Error> {
        self.iter()
            .map(|entry| {
                let base = entry
                    .values
                    .get(base_culture)
                    .ok_or_else(|| Error::MissingBaseValue {
                        key: entry.key.clone(),
                        culture: base_culture.to_string(),
                    })?;
                let is_template = self.platform() == Platform::Ios
                    && base
                        .value
                        .as_text()
                        .is_some_and(|text| IOS_TEMPLATE_REGEX.is_match(text));
                Ok(AccessorDescriptor {
                    key: entry.key.clone(),
                    value: base.value.clone(),
                    is_template,
                })
            })
            .collect()
    }
}

fn is_empty_text(value: &ValuePayload) -> bool {
    value.as_text().is_some_and(str::is_empty)
}

fn comment_for(
    culture_value: Option<&ResolvedValue>,
    base_value: Option<&ResolvedValue>,
    owner: &ResolvedValue,
) -> String {
    let description = |value: Option<&ResolvedValue>| {
        value
            .and_then(|value| value.description.clone())
            .filter(|description| !description.is_empty())
    };
    description(culture_value)
        .or_else(|| description(base_value))
        .unwrap_or_else(|| format!("From {}", owner.title))
}
