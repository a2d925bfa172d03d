//! Flat node and edge records in element-list form (`{ "data": { ... } }`).
//!
//! Well-known attributes get typed fields; everything else, including the
//! style-mode tags and `Group:<id>` membership flags, stays in `attributes`.

use crate::Color;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute names read by the style presets.
pub mod tags {
    pub const APMS_TYPE: &str = "apmsType";
    pub const DOMINANT_DATA_TYPE: &str = "dominantDataType";
    pub const PLEIO: &str = "pleio";
    pub const CURATED_TYPE: &str = "curatedType";
    pub const GROUP_PREFIX: &str = "Group:";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeElement {
    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeElement {
    pub data: EdgeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub source: String,
    #[serde(deserialize_with = "string_or_number")]
    pub target: String,
    #[serde(default)]
    pub is_pleio: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl NodeElement {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_group: impl Into<String>) -> Self {
        Self {
            data: NodeData {
                id: id.into(),
                name: name.into(),
                base_group: base_group.into(),
                color: None,
                attributes: BTreeMap::new(),
            },
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }
}

impl NodeData {
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|value| !value.is_null())
    }

    /// String value of an attribute; numbers and booleans are rendered as text.
    pub fn attribute_text(&self, key: &str) -> Option<String> {
        match self.attribute(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// JavaScript-style truthiness of an attribute. Absent attributes are falsy.
    pub fn attribute_truthy(&self, key: &str) -> bool {
        match self.attribute(key) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Integer reading of an attribute, accepting numeric strings such as `"3"`.
    pub fn attribute_int(&self, key: &str) -> Option<i64> {
        match self.attribute(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => leading_int(s),
            _ => None,
        }
    }
}

fn leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

impl EdgeElement {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            data: EdgeData {
                id: id.into(),
                source: source.into(),
                target: target.into(),
                is_pleio: false,
                color: None,
                is_member: None,
                z_index: None,
                hidden: false,
                attributes: BTreeMap::new(),
            },
        }
    }

    pub fn pleiotropic(mut self) -> Self {
        self.data.is_pleio = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }
}

/// Element ids arrive as strings or bare numbers depending on the exporter.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or number id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_element_reads_known_and_extra_attributes() {
        let node: NodeElement = serde_json::from_value(json!({
            "data": {
                "id": 42,
                "name": "BRCA1",
                "baseGroup": "X",
                "apmsType": "bait",
                "Group:7": true
            }
        }))
        .unwrap();
        assert_eq!(node.data.id, "42");
        assert_eq!(node.data.base_group, "X");
        assert_eq!(node.data.attribute_text(tags::APMS_TYPE).as_deref(), Some("bait"));
        assert!(node.data.attribute_truthy("Group:7"));
        assert!(node.data.color.is_none());
    }

    #[test]
    fn test_edge_element_defaults() {
        let edge: EdgeElement = serde_json::from_value(json!({
            "data": { "source": 1, "target": "2", "score": 0.8 }
        }))
        .unwrap();
        assert_eq!(edge.data.source, "1");
        assert_eq!(edge.data.target, "2");
        assert!(!edge.data.is_pleio);
        assert_eq!(edge.data.z_index, None);
        assert_eq!(edge.data.attributes["score"], json!(0.8));
    }

    #[test]
    fn test_styled_edge_serializes_camel_case() {
        let mut edge = EdgeElement::new("e1", "a", "b");
        edge.data.z_index = Some(999);
        edge.data.is_member = Some(true);
        edge.data.color = Some(Color::rgb(0x77, 0x77, 0x77));
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["data"]["zIndex"], 999);
        assert_eq!(value["data"]["isMember"], true);
        assert_eq!(value["data"]["color"], "#777777");
    }

    #[test]
    fn test_attribute_int_parses_numeric_strings() {
        let node = NodeElement::new("1", "g", "X")
            .with_attribute("pleio", "3")
            .with_attribute("other", 2);
        assert_eq!(node.data.attribute_int("pleio"), Some(3));
        assert_eq!(node.data.attribute_int("other"), Some(2));
        let junk = NodeElement::new("2", "g", "X").with_attribute("pleio", "many");
        assert_eq!(junk.data.attribute_int("pleio"), None);
    }

    #[test]
    fn test_truthiness_follows_loose_rules() {
        let node = NodeElement::new("1", "g", "X")
            .with_attribute("empty", "")
            .with_attribute("zero", 0)
            .with_attribute("yes", "Curated");
        assert!(!node.data.attribute_truthy("empty"));
        assert!(!node.data.attribute_truthy("zero"));
        assert!(node.data.attribute_truthy("yes"));
        assert!(!node.data.attribute_truthy("missing"));
    }
}
