//! Briefing domain types — configured items and their rendered output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp pattern for `updateDate`, as expected by flash briefing skills.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.0Z";

/// Briefing id → configured entry. Read-only once loaded.
pub type BriefingConfig = BTreeMap<String, BriefingEntry>;

/// A renderable briefing field: either a literal string or a template that
/// needs a render context.
///
/// Strings containing template markup (`{{` or `{#`) become templates.
/// Numbers and booleans are accepted as literals in their display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawField", into = "String")]
pub enum FieldValue {
    Literal(String),
    Template(String),
}

impl FieldValue {
    /// Whether `source` contains template markup.
    pub fn is_template_source(source: &str) -> bool {
        source.contains("{{") || source.contains("{#")
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Literal(s) | FieldValue::Template(s) => s,
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, FieldValue::Template(_))
    }
}

impl From<String> for FieldValue {
    fn from(source: String) -> Self {
        if Self::is_template_source(&source) {
            FieldValue::Template(source)
        } else {
            FieldValue::Literal(source)
        }
    }
}

/// Scalar forms a field may take in configuration.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl From<RawField> for FieldValue {
    fn from(raw: RawField) -> Self {
        match raw {
            RawField::Text(source) => Self::from(source),
            RawField::Integer(n) => FieldValue::Literal(n.to_string()),
            RawField::Float(n) => FieldValue::Literal(n.to_string()),
            RawField::Bool(b) => FieldValue::Literal(b.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(source: &str) -> Self {
        Self::from(source.to_string())
    }
}

impl From<FieldValue> for String {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Literal(s) | FieldValue::Template(s) => s,
        }
    }
}

/// One announcement within a briefing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BriefingItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<FieldValue>,

    /// Stable identifier; generated per render when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Audio stream URL
    #[serde(default, alias = "audio_url", skip_serializing_if = "Option::is_none")]
    pub audio: Option<FieldValue>,

    /// URL the skill offers for "read more"
    #[serde(default, alias = "redirect_url", skip_serializing_if = "Option::is_none")]
    pub display_url: Option<FieldValue>,
}

impl BriefingItem {
    /// All template-valued fields of this item, with their field names.
    pub fn templates(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("title", &self.title),
            ("text", &self.text),
            ("audio", &self.audio),
            ("display_url", &self.display_url),
        ]
        .into_iter()
        .filter_map(|(name, field)| match field {
            Some(FieldValue::Template(source)) => Some((name, source.as_str())),
            _ => None,
        })
    }
}

/// A configured briefing value.
///
/// Anything that is not a list of items is kept as `Malformed` so the
/// responder can answer "not found" for it instead of failing at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BriefingEntry {
    Items(Vec<BriefingItem>),
    Malformed(serde_json::Value),
}

impl BriefingEntry {
    pub fn items(&self) -> Option<&[BriefingItem]> {
        match self {
            BriefingEntry::Items(items) => Some(items),
            BriefingEntry::Malformed(_) => None,
        }
    }

    /// Why a malformed entry could not be read as a list of items.
    pub fn malformed_reason(&self) -> Option<String> {
        match self {
            BriefingEntry::Items(_) => None,
            BriefingEntry::Malformed(value) => {
                match serde_json::from_value::<Vec<BriefingItem>>(value.clone()) {
                    Err(e) => Some(e.to_string()),
                    Ok(_) => Some("not a list of items".into()),
                }
            }
        }
    }
}

/// A rendered briefing item in the shape flash briefing skills consume.
///
/// `titleText` is always serialized (as `null` when unset); the other
/// optional keys are omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefingOutput {
    #[serde(default)]
    pub title_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_text: Option<String>,

    pub uid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirection_url: Option<String>,

    pub update_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string_is_literal() {
        assert_eq!(FieldValue::from("Hi"), FieldValue::Literal("Hi".into()));
    }

    #[test]
    fn markup_string_is_template() {
        assert!(FieldValue::from("Hello {{ name }}").is_template());
        assert!(FieldValue::from("{# note #}text").is_template());
        assert!(!FieldValue::from("a { b }").is_template());
    }

    #[test]
    fn entries_parse_from_toml() {
        let config: BriefingConfig = toml::from_str(
            r#"
broken = "not a list"

[[morning]]
title = "Hi"
text = "News"

[[morning]]
audio_url = "https://example.com/a.mp3"
redirect_url = "https://example.com"
uid = "fixed"
"#,
        )
        .unwrap();

        let items = config["morning"].items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, Some(FieldValue::Literal("Hi".into())));
        assert_eq!(items[1].uid.as_deref(), Some("fixed"));
        assert!(items[1].audio.is_some());
        assert!(items[1].display_url.is_some());
        assert!(config["broken"].items().is_none());
    }

    #[test]
    fn unknown_item_key_makes_entry_malformed() {
        let config: BriefingConfig = toml::from_str(
            r#"
[[morning]]
titel = "typo"
"#,
        )
        .unwrap();
        assert!(matches!(config["morning"], BriefingEntry::Malformed(_)));
        let reason = config["morning"].malformed_reason().unwrap();
        assert!(reason.contains("titel"), "{reason}");
    }

    #[test]
    fn scalar_fields_become_literals() {
        let config: BriefingConfig = toml::from_str(
            r#"
[[morning]]
title = 5
text = true
audio = 1.5
"#,
        )
        .unwrap();

        let items = config["morning"].items().unwrap();
        assert_eq!(items[0].title, Some(FieldValue::Literal("5".into())));
        assert_eq!(items[0].text, Some(FieldValue::Literal("true".into())));
        assert_eq!(items[0].audio, Some(FieldValue::Literal("1.5".into())));
        assert_eq!(config["morning"].malformed_reason(), None);
    }

    #[test]
    fn item_templates_lists_only_templates() {
        let item = BriefingItem {
            title: Some("Static".into()),
            text: Some("{{ news }}".into()),
            ..BriefingItem::default()
        };
        let templates: Vec<_> = item.templates().collect();
        assert_eq!(templates, vec![("text", "{{ news }}")]);
    }

    #[test]
    fn output_key_presence() {
        let output = BriefingOutput {
            title_text: None,
            main_text: None,
            uid: "u1".into(),
            stream_url: None,
            redirection_url: None,
            update_date: "2024-01-01T00:00:00.0Z".into(),
        };
        let json = serde_json::to_value(&output).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("titleText"));
        assert!(obj["titleText"].is_null());
        assert!(!obj.contains_key("mainText"));
        assert!(!obj.contains_key("streamUrl"));
        assert!(!obj.contains_key("redirectionUrl"));
        assert_eq!(obj["uid"], "u1");
        assert_eq!(obj["updateDate"], "2024-01-01T00:00:00.0Z");
    }
}
