//! Dynamically typed values exchanged with the host engine
//!
//! Arguments, return values and object fields all travel as [`Value`].
//! Typed access goes through [`FromValue`], which is what the
//! `ObjectView` derive uses for its generated getters.

use crate::object::{ObjectHandle, PropertyBag};
use crate::EngineError;

/// A reflected engine value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null object reference or "no value"
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Object(ObjectHandle),
    List(Vec<Value>),
}

impl Value {
    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::List(_) => "list",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Convert into `T`, reporting `what` on mismatch
    pub fn convert<T: FromValue>(&self, what: &str) -> Result<T, EngineError> {
        T::from_value(self).ok_or_else(|| EngineError::TypeMismatch {
            what: what.to_string(),
            expected: T::EXPECTED,
            found: self.type_name(),
        })
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<ObjectHandle> for Value {
    fn from(v: ObjectHandle) -> Self {
        Value::Object(v)
    }
}

impl From<Option<ObjectHandle>> for Value {
    fn from(v: Option<ObjectHandle>) -> Self {
        v.map(Value::Object).unwrap_or(Value::None)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<&serde_json::Value> for Value {
    /// Objects become anonymous [`PropertyBag`]s; a `"$class"` key names the class.
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                let class = map
                    .get(PropertyBag::CLASS_KEY)
                    .and_then(|c| c.as_str())
                    .unwrap_or(PropertyBag::ANONYMOUS_CLASS);
                let bag = PropertyBag::new(class);
                for (name, field) in map {
                    if name != PropertyBag::CLASS_KEY {
                        bag.insert(name, Value::from(field));
                    }
                }
                Value::Object(bag.into_handle())
            }
        }
    }
}

/// Types that can be read out of a [`Value`]
pub trait FromValue: Sized {
    /// Human-readable type name for mismatch errors
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|i| i32::try_from(i).ok())
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float().map(|f| f as f32)
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for ObjectHandle {
    const EXPECTED: &'static str = "object";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

/// Nullable object references: `None` reads as `Some(None)`
impl FromValue for Option<ObjectHandle> {
    const EXPECTED: &'static str = "object or none";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(None),
            Value::Object(o) => Some(Some(o.clone())),
            _ => None,
        }
    }
}

impl FromValue for Vec<Value> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_list().map(<[Value]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(5i32).as_int(), Some(5));
        assert_eq!(Value::from(5i64).as_float(), Some(5.0));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::from(None::<ObjectHandle>).is_none());
    }

    #[test]
    fn test_convert_reports_mismatch() {
        let err = Value::Str("nope".into()).convert::<i64>("MonetaryValue").unwrap_err();
        assert_eq!(
            err,
            EngineError::TypeMismatch {
                what: "MonetaryValue".into(),
                expected: "int",
                found: "string",
            }
        );
    }

    #[test]
    fn test_nullable_object() {
        let none: Option<ObjectHandle> = Value::None.convert("Pickup").unwrap();
        assert!(none.is_none());
        assert!(Value::Int(1).convert::<Option<ObjectHandle>>("Pickup").is_err());
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({
            "$class": "WillowInventory",
            "MonetaryValue": 150,
            "Scale": 0.5,
            "Tags": ["a", null],
        });
        let value = Value::from(&json);
        let object = value.as_object().unwrap();
        assert_eq!(object.class_name(), "WillowInventory");
        assert_eq!(object.get_as::<i64>("MonetaryValue").unwrap(), 150);
        assert_eq!(object.get_as::<f64>("Scale").unwrap(), 0.5);
        assert_eq!(
            object.get_as::<Vec<Value>>("Tags").unwrap(),
            vec![Value::Str("a".into()), Value::None]
        );
    }
}
