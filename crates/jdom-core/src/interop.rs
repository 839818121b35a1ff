//! Conversions to and from `serde_json::Value`.
//!
//! The bridge serves embedders that already speak `serde_json` and doubles
//! as a test oracle: a printed tree can be re-read by `serde_json` and
//! checked against the value the tree was built from. Member order is
//! preserved in both directions (`serde_json` is compiled with
//! `preserve_order` here).

use serde_json::{Map, Value};

use crate::arena::Document;
use crate::types::{Kind, NodeId};

/// Largest double that still represents every integer exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Document {
    /// Build an owned tree mirroring a `serde_json::Value`.
    ///
    /// Numbers keep serde's own rendering as their cached text, so an
    /// integer stays an integer when the tree is printed, even when its
    /// magnitude exceeds what the node's double can represent exactly.
    pub fn from_serde(&mut self, value: &Value) -> NodeId {
        match value {
            Value::Null => self.create_null(),
            Value::Bool(flag) => self.create_bool(*flag),
            Value::Number(number) => {
                let id = self.create_number(number.as_f64().unwrap_or(f64::NAN));
                self.set_number_text(id, number.to_string());
                id
            }
            Value::String(text) => self.create_string(text),
            Value::Array(items) => {
                let array = self.create_array();
                for item in items {
                    let child = self.from_serde(item);
                    self.attach(array, None, child);
                }
                array
            }
            Value::Object(members) => {
                let object = self.create_object();
                for (key, member) in members {
                    let child = self.from_serde(member);
                    self.attach(object, Some(key.clone()), child);
                }
                object
            }
        }
    }

    /// Convert a subtree into a `serde_json::Value`.
    ///
    /// Aliases convert through their targets. Integral doubles within the
    /// safe-integer range become JSON integers; other finite doubles stay
    /// doubles; non-finite numbers have no JSON value and fail. A raw node
    /// must itself be valid JSON to convert. Duplicate object keys
    /// collapse last-wins, as `serde_json`'s map semantics dictate.
    pub fn to_serde(&self, id: NodeId) -> Option<Value> {
        let resolved = self.resolve(id)?;
        let node = self.node(resolved)?;
        Some(match node.kind {
            Kind::Null => Value::Null,
            Kind::False => Value::Bool(false),
            Kind::True => Value::Bool(true),
            Kind::Number => {
                let value = node.number;
                if !value.is_finite() {
                    return None;
                }
                let integral = value.fract() == 0.0
                    && value.abs() <= MAX_SAFE_INTEGER
                    && !(value == 0.0 && value.is_sign_negative());
                if integral {
                    Value::Number(serde_json::Number::from(value as i64))
                } else {
                    Value::Number(serde_json::Number::from_f64(value)?)
                }
            }
            Kind::String => Value::String(node.text.clone().unwrap_or_default()),
            Kind::Raw => serde_json::from_str(node.text.as_deref()?).ok()?,
            Kind::Array => {
                let mut items = Vec::with_capacity(node.children.len());
                for &child in &node.children {
                    items.push(self.to_serde(child)?);
                }
                Value::Array(items)
            }
            Kind::Object => {
                let mut members = Map::new();
                for &child in &node.children {
                    let key = self.node(child).and_then(|member| member.key.clone())?;
                    members.insert(key, self.to_serde(child)?);
                }
                Value::Object(members)
            }
        })
    }
}
