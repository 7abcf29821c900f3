//! Render context: named scalars and lists supplied at render time.

use serde::Serialize;
use std::fmt;

/// A scalar template value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Renders as the empty string
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One element of a list value: a scalar or a record with its own fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Element {
    Scalar(Scalar),
    Record(Context),
}

/// A context value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    List(Vec<Element>),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Element]> {
        match self {
            Value::List(items) => Some(items),
            Value::Scalar(_) => None,
        }
    }
}

/// Ordered mapping from variable name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: Vec<(String, Value)>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Context::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a variable, replacing an existing one in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Scalar entries, in insertion order.
    pub fn scalars(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.iter()
            .filter_map(|(k, v)| v.as_scalar().map(|s| (k, s)))
    }

    /// List entries, in insertion order.
    pub fn lists(&self) -> impl Iterator<Item = (&str, &[Element])> {
        self.iter().filter_map(|(k, v)| v.as_list().map(|l| (k, l)))
    }

    /// Copy of `self` with every entry of `other` set on top.
    pub fn merged(&self, other: &Context) -> Context {
        let mut merged = self.clone();
        for (k, v) in other.iter() {
            merged.insert(k, v.clone());
        }
        merged
    }
}

impl Serialize for Context {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident($conv:expr)),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant($conv(v))
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool(|v| v),
    i64 => Int(|v| v),
    u32 => Int(i64::from),
    usize => Int(|v: usize| v as i64),
    f64 => Float(|v| v),
    String => Text(|v| v),
    &str => Text(|v: &str| v.to_string()),
}

impl<T: Into<Scalar>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Scalar(v.map_or(Scalar::Null, Into::into))
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Vec<Element>> for Value {
    fn from(items: Vec<Element>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items.into_iter().map(|s| Element::Scalar(Scalar::Text(s))).collect())
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        items
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
            .into()
    }
}

impl From<Vec<Context>> for Value {
    fn from(records: Vec<Context>) -> Self {
        Value::List(records.into_iter().map(Element::Record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Int(-4).to_string(), "-4");
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_eq!(Scalar::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_context_order_and_replace() {
        let mut ctx = Context::new()
            .with("b", 1usize)
            .with("a", vec!["x", "y"])
            .with("c", None::<String>);
        ctx.insert("b", "two");

        let keys: Vec<&str> = ctx.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(ctx.get("b"), Some(&Value::Scalar(Scalar::Text("two".into()))));
        assert_eq!(ctx.scalars().count(), 2);
        assert_eq!(ctx.lists().count(), 1);
    }

    #[test]
    fn test_merged_overrides() {
        let base = Context::new().with("color", "red").with("size", 3usize);
        let top = Context::new().with("color", "blue");
        let merged = base.merged(&top);
        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.get("color").and_then(Value::as_scalar),
            Some(&Scalar::Text("blue".into()))
        );
    }

    #[test]
    fn test_serialize_records() {
        let ctx = Context::new().with(
            "rows",
            vec![Context::new().with("name", "a").with("ok", true)],
        );
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, r#"{"rows":[{"name":"a","ok":true}]}"#);
    }
}
