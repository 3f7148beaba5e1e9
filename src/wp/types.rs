//! WordPress REST data types
//!
//! Host JSON is deserialized into private `Raw*` shapes and converted into the
//! console's own types, so a missing or oddly-typed field never fails a whole
//! listing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Content types never offered in the console
pub const EXCLUDED_CONTENT_TYPES: [&str; 4] =
    ["attachment", "nav_menu_item", "wp_block", "wp_template"];

// ============================================
// Authentication
// ============================================

/// Value of the `Authorization` header sent with every request
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Build a Basic credential from `username:password`
    pub fn basic(username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        Self(format!("Basic {}", encoded))
    }

    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Site URL plus the token used against it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub site_url: String,
    pub token: AuthToken,
}

impl Credentials {
    pub fn new(site_url: &str, token: AuthToken) -> Self {
        Self {
            site_url: normalize_site_url(site_url),
            token,
        }
    }
}

/// Trim whitespace and trailing slashes from an operator-entered site URL
pub fn normalize_site_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// The authenticated account, from `/users/me`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserInfo {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl UserInfo {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("User")
    }
}

// ============================================
// Content types
// ============================================

/// A registered content type exposed over REST
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentType {
    pub key: String,
    pub name: String,
    pub rest_base: String,
}

#[derive(Deserialize)]
struct RawContentType {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rest_base: Value,
}

/// Convert the `/types` response, dropping internal types and types that are
/// not routable over REST.
pub fn content_types_from_json(types: BTreeMap<String, Value>) -> BTreeMap<String, ContentType> {
    types
        .into_iter()
        .filter(|(key, _)| !EXCLUDED_CONTENT_TYPES.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            let raw: RawContentType = serde_json::from_value(value).ok()?;
            let rest_base = raw.rest_base.as_str().filter(|b| !b.is_empty())?.to_string();
            let name = raw.name.filter(|n| !n.is_empty()).unwrap_or_else(|| key.clone());
            Some((
                key.clone(),
                ContentType {
                    key,
                    name,
                    rest_base,
                },
            ))
        })
        .collect()
}

// ============================================
// Entries
// ============================================

/// Publication status of an entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntryStatus {
    #[default]
    Draft,
    Publish,
    Pending,
    Private,
    /// Any other host status (future, trash, ...), shown but not selectable
    Other(String),
}

impl EntryStatus {
    /// Statuses offered by the editor, in display order
    pub const SELECTABLE: [EntryStatus; 4] = [
        EntryStatus::Draft,
        EntryStatus::Publish,
        EntryStatus::Pending,
        EntryStatus::Private,
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "draft" => EntryStatus::Draft,
            "publish" => EntryStatus::Publish,
            "pending" => EntryStatus::Pending,
            "private" => EntryStatus::Private,
            other => EntryStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Publish => "publish",
            EntryStatus::Pending => "pending",
            EntryStatus::Private => "private",
            EntryStatus::Other(s) => s,
        }
    }

    pub fn is_selectable(&self) -> bool {
        !matches!(self, EntryStatus::Other(_))
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntryStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An entry of some content type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entry {
    /// Absent until the entry has been created
    pub id: Option<u64>,
    pub title: String,
    /// Raw HTML
    pub content: String,
    pub status: EntryStatus,
    /// Host-local publication date as returned by the API
    pub date: Option<String>,
    pub meta_boxes: Vec<MetaBox>,
}

impl Entry {
    /// Date formatted for the entry list, or the raw value when unparseable
    pub fn formatted_date(&self) -> String {
        let Some(date) = self.date.as_deref() else {
            return String::new();
        };

        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        match chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
            Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            Err(_) => date.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Rendered {
    #[serde(default)]
    raw: Option<String>,
    #[serde(default)]
    rendered: Option<String>,
}

impl Rendered {
    fn into_text(self) -> String {
        self.raw.or(self.rendered).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    title: Option<Rendered>,
    #[serde(default)]
    content: Option<Rendered>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    acpt: Option<RawAcpt>,
}

#[derive(Debug, Deserialize)]
struct RawAcpt {
    #[serde(default)]
    meta: Option<Vec<RawMetaBox>>,
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        Entry {
            id: raw.id,
            title: raw.title.map(Rendered::into_text).unwrap_or_default(),
            content: raw.content.map(Rendered::into_text).unwrap_or_default(),
            status: raw
                .status
                .as_deref()
                .map(EntryStatus::parse)
                .unwrap_or_default(),
            date: raw.date,
            meta_boxes: raw
                .acpt
                .and_then(|a| a.meta)
                .unwrap_or_default()
                .into_iter()
                .map(MetaBox::from)
                .collect(),
        }
    }
}

// ============================================
// Custom meta fields
// ============================================

/// A named group of custom fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetaBox {
    pub name: String,
    pub fields: Vec<MetaField>,
}

/// The field-type tags the form renderer understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Textarea,
    Select,
    Checkbox,
    Number,
    /// Tag not understood by the console; rendered as nothing
    Unknown(String),
}

impl FieldKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "Text" => FieldKind::Text,
            "Textarea" => FieldKind::Textarea,
            "Select" => FieldKind::Select,
            "Checkbox" => FieldKind::Checkbox,
            "Number" => FieldKind::Number,
            other => FieldKind::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SelectOption {
    #[serde(default, deserialize_with = "string_or_scalar")]
    pub value: String,
    #[serde(default, deserialize_with = "string_or_scalar")]
    pub label: String,
}

/// A single custom field with its current stored value
#[derive(Debug, Clone, PartialEq)]
pub struct MetaField {
    pub name: String,
    pub kind: FieldKind,
    pub value: Value,
    /// Only meaningful for `FieldKind::Select`
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Deserialize)]
struct RawMetaBox {
    #[serde(default, deserialize_with = "string_or_scalar")]
    meta_box: String,
    #[serde(default)]
    meta_fields: Option<Vec<RawMetaField>>,
}

#[derive(Debug, Deserialize)]
struct RawMetaField {
    #[serde(default, deserialize_with = "string_or_scalar")]
    name: String,
    /// Missing means `Text`; an explicit null or non-string tag is unknown
    #[serde(default = "default_field_kind", rename = "type")]
    kind: Value,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    options: Option<Vec<SelectOption>>,
}

impl From<RawMetaBox> for MetaBox {
    fn from(raw: RawMetaBox) -> Self {
        MetaBox {
            name: raw.meta_box,
            fields: raw
                .meta_fields
                .unwrap_or_default()
                .into_iter()
                .map(|f| MetaField {
                    name: f.name,
                    kind: match &f.kind {
                        Value::String(tag) => FieldKind::parse(tag),
                        other => FieldKind::Unknown(other.to_string()),
                    },
                    value: f.value.unwrap_or_else(|| Value::String(String::new())),
                    options: f.options.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

fn default_field_kind() -> Value {
    Value::String("Text".to_string())
}

fn string_or_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A value collected from an editor widget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Number(f64),
}

/// One field of the meta payload sent on save
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaUpdate {
    #[serde(rename = "box")]
    pub box_name: String,
    pub field: String,
    pub value: FieldValue,
}

/// Body of a create/update request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub status: EntryStatus,
    #[serde(rename = "acpt", skip_serializing_if = "Vec::is_empty", serialize_with = "acpt_block")]
    pub meta: Vec<MetaUpdate>,
}

fn acpt_block<S: serde::Serializer>(meta: &[MetaUpdate], serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Acpt<'a> {
        meta: &'a [MetaUpdate],
    }
    Acpt { meta }.serialize(serializer)
}
