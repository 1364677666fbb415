//! Core types for string-resolver.
//! Content loaders decode into the document types; the merger produces the
//! resolved types.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::Error, traits::Parser};

impl Parser for EntryDocument {
    /// Parse from any reader.
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Parse)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(Error::Parse)
    }
}

impl Parser for Vec<EntryDocument> {
    /// Parse from any reader.
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Parse)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer(&mut writer, self).map_err(Error::Parse)
    }
}

/// A target platform a resolved table is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            _ => Err(Error::validation_error(format!(
                "Unknown platform `{}`, expected `ios` or `android`",
                s
            ))),
        }
    }
}

/// The platform a document is written for.
///
/// A document without a `platform` field behaves like [`PlatformScope::All`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformScope {
    All,
    Ios,
    Android,
}

impl PlatformScope {
    pub fn includes(self, platform: Platform) -> bool {
        match self {
            PlatformScope::All => true,
            PlatformScope::Ios => platform == Platform::Ios,
            PlatformScope::Android => platform == Platform::Android,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlatformScope::All => "all",
            PlatformScope::Ios => "ios",
            PlatformScope::Android => "android",
        }
    }
}

impl Display for PlatformScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Platform> for PlatformScope {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Ios => PlatformScope::Ios,
            Platform::Android => PlatformScope::Android,
        }
    }
}

/// The `type` tag of an entry. Unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum EntryKind {
    String,
    Plural,
    Other(String),
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::String => "string",
            EntryKind::Plural => "plural",
            EntryKind::Other(tag) => tag,
        }
    }

    /// Whether `payload` has the shape this kind requires.
    pub fn accepts(&self, payload: &ValuePayload) -> bool {
        match self {
            EntryKind::String => matches!(payload, ValuePayload::Text(_)),
            EntryKind::Plural => matches!(payload, ValuePayload::Plural(_)),
            EntryKind::Other(_) => true,
        }
    }
}

impl From<String> for EntryKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "string" => EntryKind::String,
            "plural" => EntryKind::Plural,
            _ => EntryKind::Other(tag),
        }
    }
}

impl From<EntryKind> for String {
    fn from(kind: EntryKind) -> Self {
        kind.as_str().to_string()
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard CLDR plural forms.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ZERO" => Ok(PluralCategory::Zero),
            "ONE" => Ok(PluralCategory::One),
            "TWO" => Ok(PluralCategory::Two),
            "FEW" => Ok(PluralCategory::Few),
            "MANY" => Ok(PluralCategory::Many),
            "OTHER" => Ok(PluralCategory::Other),
            _ => Err(format!("Unknown plural category: {}", s)),
        }
    }
}

/// The payload of one value variant.
///
/// In JSON a text value is a plain string and a plural value is an object
/// keyed by plural category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ValuePayload {
    Text(String),
    Plural(BTreeMap<PluralCategory, String>),
}

impl ValuePayload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ValuePayload::Text(text) => Some(text),
            ValuePayload::Plural(_) => None,
        }
    }
}

impl Display for ValuePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValuePayload::Text(text) => write!(f, "{}", text),
            ValuePayload::Plural(forms) => {
                let parts = forms
                    .iter()
                    .map(|(category, text)| format!("{:?}={}", category, text))
                    .collect::<Vec<_>>();
                write!(f, "{}", parts.join(" | "))
            }
        }
    }
}

impl From<&str> for ValuePayload {
    fn from(text: &str) -> Self {
        ValuePayload::Text(text.to_string())
    }
}

/// One candidate value of an entry, optionally gated by per-platform
/// version ranges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueVariant {
    pub value: ValuePayload,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub ios_semver: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub android_semver: Option<String>,
}

impl ValueVariant {
    /// Returns the range gating this variant on `platform`, if any.
    pub fn range_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Ios => self.ios_semver.as_deref(),
            Platform::Android => self.android_semver.as_deref(),
        }
    }
}

/// A single string definition inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    pub key: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Optional comment for translators.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub do_not_translate: Option<bool>,

    #[serde(default)]
    pub values: Vec<ValueVariant>,
}

/// One JSON content file: a batch of entries for a single language,
/// contributed by a single source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDocument {
    /// Human-readable source label, used in conflict messages.
    pub title: String,

    /// Prefix prepended to every key in this document.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub base_name: Option<String>,

    pub lang: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub platform: Option<PlatformScope>,

    #[serde(default)]
    pub entries: Vec<DocumentEntry>,
}

impl EntryDocument {
    /// The key `key` is exposed under once this document's base name is applied.
    pub fn final_key(&self, key: &str) -> String {
        match &self.base_name {
            Some(base_name) => format!("{}{}", base_name, key),
            None => key.to_string(),
        }
    }

    /// The effective platform scope; absent means every platform.
    pub fn scope(&self) -> PlatformScope {
        self.platform.unwrap_or(PlatformScope::All)
    }
}

/// The value one document supplied for one language of a resolved key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedValue {
    pub title: String,
    pub value: ValuePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A string key after merging, with one value slot per language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedKeyEntry {
    /// The exposed key, including the base name of the first defining document.
    pub key: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub do_not_translate: bool,
    pub values: BTreeMap<String, ResolvedValue>,
}

impl Display for ResolvedKeyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ResolvedKeyEntry {{ key: {}, type: {}, languages: {} }}",
            self.key,
            self.kind,
            self.values.keys().cloned().collect::<Vec<_>>().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_deserialize_minimal() {
        let json = r#"{
            "title": "Test iOS Entry",
            "platform": "ios",
            "lang": "en",
            "entries": [
                { "type": "string", "key": "simpleString", "values": [{ "value": "This is iOS" }] }
            ]
        }"#;
        let doc = EntryDocument::from_str(json).unwrap();
        assert_eq!(doc.title, "Test iOS Entry");
        assert_eq!(doc.platform, Some(PlatformScope::Ios));
        assert_eq!(doc.entries[0].kind, EntryKind::String);
        assert_eq!(
            doc.entries[0].values[0].value,
            ValuePayload::Text("This is iOS".to_string())
        );
        assert_eq!(doc.entries[0].do_not_translate, None);
    }

    #[test]
    fn test_document_deserialize_plural_and_semver() {
        let json = r#"{
            "title": "Counts",
            "baseName": "counts.",
            "lang": "en",
            "entries": [{
                "type": "plural",
                "key": "apples",
                "doNotTranslate": true,
                "values": [{
                    "value": { "one": "%d apple", "other": "%d apples" },
                    "iosSemver": ">=2.0.0",
                    "androidSemver": "<3.0.0"
                }]
            }]
        }"#;
        let doc = EntryDocument::from_str(json).unwrap();
        let entry = &doc.entries[0];
        assert_eq!(entry.kind, EntryKind::Plural);
        assert_eq!(entry.do_not_translate, Some(true));
        let variant = &entry.values[0];
        match &variant.value {
            ValuePayload::Plural(forms) => {
                assert_eq!(forms.get(&PluralCategory::One).unwrap(), "%d apple");
                assert_eq!(forms.len(), 2);
            }
            other => panic!("expected plural, got {:?}", other),
        }
        assert_eq!(variant.range_for(Platform::Ios), Some(">=2.0.0"));
        assert_eq!(variant.range_for(Platform::Android), Some("<3.0.0"));
        assert_eq!(doc.final_key("apples"), "counts.apples");
        assert_eq!(doc.scope(), PlatformScope::All);
    }

    #[test]
    fn test_unknown_entry_kind_is_preserved() {
        let kind: EntryKind = serde_json::from_str("\"attributed\"").unwrap();
        assert_eq!(kind, EntryKind::Other("attributed".to_string()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"attributed\"");
        assert!(kind.accepts(&ValuePayload::from("x")));
    }

    #[test]
    fn test_entry_kind_accepts() {
        let text = ValuePayload::from("hello");
        let plural = ValuePayload::Plural(BTreeMap::from([(
            PluralCategory::Other,
            "many".to_string(),
        )]));
        assert!(EntryKind::String.accepts(&text));
        assert!(!EntryKind::String.accepts(&plural));
        assert!(EntryKind::Plural.accepts(&plural));
        assert!(!EntryKind::Plural.accepts(&text));
    }

    #[test]
    fn test_platform_scope_includes() {
        assert!(PlatformScope::All.includes(Platform::Ios));
        assert!(PlatformScope::All.includes(Platform::Android));
        assert!(PlatformScope::Ios.includes(Platform::Ios));
        assert!(!PlatformScope::Ios.includes(Platform::Android));
        assert!(!PlatformScope::Android.includes(Platform::Ios));
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("ios".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!(" Android ".parse::<Platform>().unwrap(), Platform::Android);
        assert!("windows".parse::<Platform>().is_err());
    }

    #[test]
    fn test_unknown_platform_scope_is_rejected() {
        let json = r#"{ "title": "x", "lang": "en", "platform": "windows", "entries": [] }"#;
        assert!(EntryDocument::from_str(json).is_err());
    }

    #[test]
    fn test_plural_category_from_str() {
        assert_eq!(
            PluralCategory::from_str("zero").unwrap(),
            PluralCategory::Zero
        );
        assert_eq!(PluralCategory::from_str("FEW").unwrap(), PluralCategory::Few);
        assert!(PluralCategory::from_str("invalid").is_err());
    }

    #[test]
    fn test_value_payload_serializes_untagged() {
        let text = ValuePayload::from("This is iOS v2");
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"This is iOS v2\"");

        let plural = ValuePayload::Plural(BTreeMap::from([
            (PluralCategory::One, "1 item".to_string()),
            (PluralCategory::Other, "%d items".to_string()),
        ]));
        assert_eq!(
            serde_json::to_string(&plural).unwrap(),
            r#"{"one":"1 item","other":"%d items"}"#
        );
        assert_eq!(format!("{}", plural), "One=1 item | Other=%d items");
    }

    #[test]
    fn test_document_list_parser_roundtrip() {
        let docs = vec![EntryDocument {
            title: "Home".to_string(),
            base_name: None,
            lang: "en".to_string(),
            platform: Some(PlatformScope::All),
            entries: vec![],
        }];

        let mut writer = Vec::new();
        docs.to_writer(&mut writer).unwrap();

        let parsed = Vec::<EntryDocument>::from_bytes(&writer).unwrap();
        assert_eq!(parsed, docs);
    }
}
