//! Property bags: the open key/value record stored on every shape.
//!
//! A [`Properties`] value is used both as the stored bag and as a patch.
//! Merging is shallow: top-level keys in the patch replace the stored ones.
//! Only `color`, `position` and `scale` have a visual effect; other keys are
//! stored and round-trip untouched.

use crate::node::Node;
use crate::shapes::{ColorParseError, ShapeColor};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

pub const COLOR_KEY: &str = "color";
pub const POSITION_KEY: &str = "position";
pub const SCALE_KEY: &str = "scale";

/// Errors from reading or building property bags.
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("Invalid property JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Properties must be a JSON object, got: {0}")]
    NotAnObject(String),
    #[error("Invalid color: {0}")]
    Color(#[from] ColorParseError),
    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// A pair of optional axes. `None` keeps the current value on that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl AxisPatch {
    /// Resolve against the current value.
    pub fn or(self, current: Vec2) -> Vec2 {
        Vec2::new(self.x.unwrap_or(current.x), self.y.unwrap_or(current.y))
    }
}

/// Open property record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(Map<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object.
    pub fn from_json(json: &str) -> Result<Self, PropertyError> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }

    pub fn to_json(&self) -> Result<String, PropertyError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Set an arbitrary key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set `color` to a packed `0xRRGGBB` number.
    pub fn with_color(self, hex: u32) -> Self {
        self.with(COLOR_KEY, hex)
    }

    pub fn with_position(self, x: f64, y: f64) -> Self {
        self.with(POSITION_KEY, axis_object(Some(x), Some(y)))
    }

    pub fn with_position_x(self, x: f64) -> Self {
        self.with(POSITION_KEY, axis_object(Some(x), None))
    }

    pub fn with_position_y(self, y: f64) -> Self {
        self.with(POSITION_KEY, axis_object(None, Some(y)))
    }

    pub fn with_scale(self, x: f64, y: f64) -> Self {
        self.with(SCALE_KEY, axis_object(Some(x), Some(y)))
    }

    pub fn with_scale_x(self, x: f64) -> Self {
        self.with(SCALE_KEY, axis_object(Some(x), None))
    }

    pub fn with_scale_y(self, y: f64) -> Self {
        self.with(SCALE_KEY, axis_object(None, Some(y)))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow merge: every top-level key of `patch` overwrites ours.
    pub fn merge(&mut self, patch: &Properties) {
        for (key, value) in &patch.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Read `color`. `None` when absent or null.
    pub fn color(&self) -> Option<Result<ShapeColor, PropertyError>> {
        match self.0.get(COLOR_KEY)? {
            Value::Null => None,
            Value::Number(n) => Some(
                n.as_u64()
                    .filter(|hex| *hex <= 0xFF_FFFF)
                    .map(|hex| ShapeColor::from_hex(hex as u32))
                    .ok_or_else(|| invalid(COLOR_KEY, &Value::Number(n.clone()))),
            ),
            Value::String(s) => Some(s.parse().map_err(PropertyError::from)),
            other => Some(Err(invalid(COLOR_KEY, other))),
        }
    }

    /// Read `position`. `None` when absent or null.
    pub fn position(&self) -> Option<Result<AxisPatch, PropertyError>> {
        self.axes(POSITION_KEY)
    }

    /// Read `scale`. `None` when absent or null.
    pub fn scale(&self) -> Option<Result<AxisPatch, PropertyError>> {
        self.axes(SCALE_KEY)
    }

    fn axes(&self, key: &'static str) -> Option<Result<AxisPatch, PropertyError>> {
        let value = self.0.get(key)?;
        let object = match value {
            Value::Null => return None,
            Value::Object(object) => object,
            other => return Some(Err(invalid(key, other))),
        };
        let axis = |name: &str| -> Result<Option<f64>, PropertyError> {
            match object.get(name) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::Number(n)) => n
                    .as_f64()
                    .filter(|v| v.is_finite())
                    .map(Some)
                    .ok_or_else(|| invalid(key, value)),
                Some(_) => Err(invalid(key, value)),
            }
        };
        Some(axis("x").and_then(|x| Ok(AxisPatch { x, y: axis("y")? })))
    }

    /// Apply the recognized keys of this bag to a node.
    ///
    /// Position writes reset depth to zero and scale writes reset the depth
    /// scale to one. Malformed values are skipped.
    pub fn apply_to(&self, node: &mut Node) {
        match self.color() {
            Some(Ok(color)) => node.set_color(color),
            Some(Err(e)) => log::warn!("Ignoring color property: {}", e),
            None => {}
        }

        match self.position() {
            Some(Ok(axes)) => {
                let transform = &mut node.transform;
                transform.position = axes.or(transform.position.to_vec2()).to_point();
                transform.depth = 0.0;
            }
            Some(Err(e)) => log::warn!("Ignoring position property: {}", e),
            None => {}
        }

        match self.scale() {
            Some(Ok(axes)) => {
                let transform = &mut node.transform;
                transform.scale = axes.or(transform.scale);
                transform.depth_scale = 1.0;
            }
            Some(Err(e)) => log::warn!("Ignoring scale property: {}", e),
            None => {}
        }
    }
}

impl TryFrom<Value> for Properties {
    type Error = PropertyError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PropertyError::NotAnObject(other.to_string())),
        }
    }
}

impl From<Properties> for Value {
    fn from(properties: Properties) -> Self {
        Value::Object(properties.0)
    }
}

fn axis_object(x: Option<f64>, y: Option<f64>) -> Value {
    let mut map = Map::new();
    for (name, axis) in [("x", x), ("y", y)] {
        if let Some(number) = axis.and_then(Number::from_f64) {
            map.insert(name.to_string(), Value::Number(number));
        }
    }
    Value::Object(map)
}

fn invalid(key: &'static str, value: &Value) -> PropertyError {
    PropertyError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Material, Primitive};
    use kurbo::Point;
    use serde_json::json;

    fn node() -> Node {
        Node::new(
            Primitive::Plane {
                width: 1.0,
                height: 1.0,
            },
            Material::Solid(ShapeColor::from_hex(0x0000ff)),
        )
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut bag = Properties::new().with_position(1.0, 2.0).with("name", "a");
        bag.merge(&Properties::new().with_position_x(5.0));

        assert_eq!(bag.get("position"), Some(&json!({ "x": 5.0 })));
        assert_eq!(bag.get("name"), Some(&json!("a")));
    }

    #[test]
    fn test_unknown_keys_roundtrip() {
        let bag = Properties::from_json(r#"{"label":"hello","weight":3}"#).unwrap();
        let mut node = node();
        bag.apply_to(&mut node);

        assert_eq!(node, self::node());
        assert_eq!(bag.len(), 2);
        assert_eq!(Properties::from_json(&bag.to_json().unwrap()).unwrap(), bag);
    }

    #[test]
    fn test_single_axis_keeps_other() {
        let mut node = node();
        Properties::new().with_position(3.0, 4.0).apply_to(&mut node);
        Properties::new().with_position_y(7.0).apply_to(&mut node);
        assert_eq!(node.transform.position, Point::new(3.0, 7.0));

        Properties::new().with_scale_x(2.0).apply_to(&mut node);
        assert_eq!(node.transform.scale, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_null_axis_keeps_current() {
        let mut node = node();
        node.transform.position = Point::new(1.0, 1.0);
        let patch = Properties::from_json(r#"{"position":{"x":null,"y":9}}"#).unwrap();
        patch.apply_to(&mut node);
        assert_eq!(node.transform.position, Point::new(1.0, 9.0));
    }

    #[test]
    fn test_color_zero_is_applied() {
        let mut node = node();
        Properties::new().with_color(0).apply_to(&mut node);
        assert_eq!(node.color(), Some(ShapeColor::black()));
    }

    #[test]
    fn test_color_string_is_applied() {
        let mut node = node();
        Properties::new().with("color", "#ff8800").apply_to(&mut node);
        assert_eq!(node.color(), Some(ShapeColor::from_hex(0xff8800)));
    }

    #[test]
    fn test_malformed_values_are_stored_but_ignored() {
        let patch = Properties::new()
            .with("color", "not a color")
            .with("position", "left")
            .with("scale", json!({ "x": "big" }));
        let mut node = node();
        patch.apply_to(&mut node);

        assert_eq!(node, self::node());
        assert!(matches!(patch.color(), Some(Err(PropertyError::Color(_)))));
        assert!(matches!(
            patch.position(),
            Some(Err(PropertyError::InvalidValue { key: "position", .. }))
        ));
        assert!(patch.scale().is_some_and(|r| r.is_err()));
    }

    #[test]
    fn test_out_of_range_color_number() {
        let patch = Properties::new().with("color", 0x1_000_000u64);
        assert!(matches!(
            patch.color(),
            Some(Err(PropertyError::InvalidValue { key: "color", .. }))
        ));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(matches!(
            Properties::from_json("[1,2]"),
            Err(PropertyError::NotAnObject(_))
        ));
        assert!(matches!(
            Properties::from_json("{"),
            Err(PropertyError::Json(_))
        ));
    }
}
