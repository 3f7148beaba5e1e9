//! Dynamic Form Renderer
//!
//! Maps each custom field to an input widget and reads the submitted values
//! back into the meta payload. Fields of an unknown type produce no widget and
//! therefore nothing in the payload.

use serde_json::Value;
use std::collections::HashMap;

use super::html::escape;
use crate::wp::{FieldKind, FieldValue, MetaBox, MetaField, MetaUpdate, SelectOption};

/// Input widget for one field, seeded from its stored value
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    TextInput { value: String },
    TextArea { value: String },
    /// `selected` indexes `options`; meaningless when `options` is empty
    Select { options: Vec<SelectOption>, selected: usize },
    Checkbox { checked: bool },
    Number { value: f64 },
}

impl Widget {
    /// Choose and seed the widget for a field, or `None` for unknown types
    pub fn for_field(field: &MetaField) -> Option<Self> {
        let widget = match &field.kind {
            FieldKind::Text => Widget::TextInput {
                value: value_as_text(&field.value),
            },
            FieldKind::Textarea => Widget::TextArea {
                value: value_as_text(&field.value),
            },
            FieldKind::Select => {
                let current = value_as_text(&field.value);
                let selected = field
                    .options
                    .iter()
                    .position(|o| o.value == current)
                    .unwrap_or(0);
                Widget::Select {
                    options: field.options.clone(),
                    selected,
                }
            }
            FieldKind::Checkbox => Widget::Checkbox {
                checked: truthy(&field.value),
            },
            FieldKind::Number => Widget::Number {
                value: value_as_number(&field.value),
            },
            FieldKind::Unknown(tag) => {
                tracing::debug!(field = %field.name, tag = %tag, "Skipping field of unknown type");
                return None;
            }
        };
        Some(widget)
    }

    /// Read this widget's value from a submission
    ///
    /// Returns `None` when the widget has nothing to save (a select without
    /// options).
    pub fn collect(&self, submitted: Option<&str>) -> Option<FieldValue> {
        match self {
            Widget::TextInput { value } | Widget::TextArea { value } => Some(FieldValue::Text(
                submitted.map(str::to_string).unwrap_or_else(|| value.clone()),
            )),
            Widget::Select { options, selected } => {
                let chosen = submitted
                    .and_then(|s| options.iter().find(|o| o.value == s))
                    .or_else(|| options.get(*selected))?;
                Some(FieldValue::Text(chosen.value.clone()))
            }
            Widget::Checkbox { .. } => Some(FieldValue::Bool(submitted.is_some())),
            Widget::Number { value } => Some(FieldValue::Number(
                submitted
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .filter(|n| n.is_finite())
                    .unwrap_or(*value),
            )),
        }
    }

    fn render(&self, key: &str, label: &str) -> String {
        let key = escape(key);
        let label = escape(label);
        match self {
            Widget::TextInput { value } => format!(
                r#"<label>{label}<input type="text" name="{key}" value="{}"></label>"#,
                escape(value)
            ),
            Widget::TextArea { value } => format!(
                r#"<label>{label}<textarea name="{key}" rows="4">{}</textarea></label>"#,
                escape(value)
            ),
            Widget::Select { options, selected } => {
                if options.is_empty() {
                    return format!(r#"<label>{label}<select name="{key}" disabled></select></label>"#);
                }
                let opts: String = options
                    .iter()
                    .enumerate()
                    .map(|(i, o)| {
                        let text = if o.label.is_empty() { &o.value } else { &o.label };
                        format!(
                            r#"<option value="{}"{}>{}</option>"#,
                            escape(&o.value),
                            if i == *selected { " selected" } else { "" },
                            escape(text)
                        )
                    })
                    .collect();
                format!(r#"<label>{label}<select name="{key}">{opts}</select></label>"#)
            }
            Widget::Checkbox { checked } => format!(
                r#"<label class="check"><input type="checkbox" name="{key}" value="on"{}> {label}</label>"#,
                if *checked { " checked" } else { "" }
            ),
            Widget::Number { value } => format!(
                r#"<label>{label}<input type="number" step="any" name="{key}" value="{}"></label>"#,
                value
            ),
        }
    }
}

/// Form control name for the field at `(box_index, field_index)`
pub fn field_key(box_index: usize, field_index: usize) -> String {
    format!("meta-{}-{}", box_index, field_index)
}

/// Render every meta box and its known fields
pub fn render_meta_boxes(boxes: &[MetaBox]) -> String {
    let mut out = String::new();
    for (b, meta_box) in boxes.iter().enumerate() {
        out.push_str(&format!(
            r#"<fieldset class="meta-box"><legend>{}</legend>"#,
            escape(&meta_box.name)
        ));
        for (f, field) in meta_box.fields.iter().enumerate() {
            if let Some(widget) = Widget::for_field(field) {
                out.push_str(&widget.render(&field_key(b, f), &field.name));
            }
        }
        out.push_str("</fieldset>");
    }
    out
}

/// Rebuild the complete meta payload from a form submission
///
/// Every rendered field is included whether or not it changed.
pub fn collect_meta(boxes: &[MetaBox], form: &HashMap<String, String>) -> Vec<MetaUpdate> {
    let mut meta = Vec::new();
    for (b, meta_box) in boxes.iter().enumerate() {
        for (f, field) in meta_box.fields.iter().enumerate() {
            let Some(widget) = Widget::for_field(field) else {
                continue;
            };
            let submitted = form.get(&field_key(b, f)).map(String::as_str);
            if let Some(value) = widget.collect(submitted) {
                meta.push(MetaUpdate {
                    box_name: meta_box.name.clone(),
                    field: field.name.clone(),
                    value,
                });
            }
        }
    }
    meta
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Loose truthiness: null, false, zero, and empty strings or collections are false
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Stored number, or 0 when empty or unparseable
fn value_as_number(value: &Value) -> f64 {
    if !truthy(value) {
        return 0.0;
    }
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}
