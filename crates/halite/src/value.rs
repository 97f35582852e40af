use crate::error::{Error, Result};
use crate::instance::BoundPresenter;
use crate::resource::{Attributes, Record, Resource, ResourceType};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A presented document: a tree of ordered maps, sequences, and scalars.
///
/// Encoding it (e.g. `serde_json::to_string`) is left to the caller.
pub type Document = serde_json::Value;

/// A dynamic value read from a resource, computed by a handler, or passed
/// in as a presentation context.
#[derive(Clone)]
pub enum Value {
    /// Scalars, nil, and raw JSON. Presented unchanged.
    Plain(serde_json::Value),
    Resource(Arc<dyn Resource>),
    List(List),
    /// A presenter already bound to a resource.
    Bound(Arc<BoundPresenter>),
    /// Arbitrary payload, typically a helper passed as context.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn null() -> Self {
        Value::Plain(serde_json::Value::Null)
    }

    pub fn resource<R: Resource + 'static>(resource: R) -> Self {
        Value::Resource(Arc::new(resource))
    }

    pub fn opaque<T: Any + Send + Sync>(payload: T) -> Self {
        Value::Opaque(Arc::new(payload))
    }

    /// Convert a JSON tree into values: objects become untyped records,
    /// arrays become lists, everything else stays plain.
    pub fn materialize(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(object) => {
                Record::from_json(ResourceType::object(), object).into_value()
            }
            serde_json::Value::Array(items) => {
                Value::List(List::new(items.into_iter().map(Value::materialize)))
            }
            other => Value::Plain(other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Plain(serde_json::Value::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Plain(json) => json.as_str(),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Plain(json) => Some(json),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Arc<dyn Resource>> {
        match self {
            Value::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(payload) => payload.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn resource_type(&self) -> Option<ResourceType> {
        match self {
            Value::Resource(resource) => Some(resource.resource_type()),
            _ => None,
        }
    }

    /// Short description of the value's shape, for errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Plain(serde_json::Value::Null) => "nil",
            Value::Plain(serde_json::Value::Bool(_)) => "boolean",
            Value::Plain(serde_json::Value::Number(_)) => "number",
            Value::Plain(serde_json::Value::String(_)) => "string",
            Value::Plain(serde_json::Value::Array(_)) => "array",
            Value::Plain(serde_json::Value::Object(_)) => "object",
            Value::Resource(_) => "resource",
            Value::List(_) => "list",
            Value::Bound(_) => "presenter",
            Value::Opaque(_) => "opaque value",
        }
    }

    /// Render without any presenter: plain JSON as is, resources through
    /// `Resource::to_document`, lists element by element.
    pub fn to_raw_document(&self) -> Result<Document> {
        match self {
            Value::Plain(json) => Ok(json.clone()),
            Value::Resource(resource) => resource.to_document(),
            Value::List(list) => list
                .iter()
                .map(Value::to_raw_document)
                .collect::<Result<Vec<_>>>()
                .map(Document::Array),
            Value::Bound(_) | Value::Opaque(_) => Err(Error::Unpresentable(self.kind().to_string())),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl Attributes for Value {
    fn attribute(&self, name: &str) -> Result<Value> {
        match self {
            Value::Resource(resource) => resource.attribute(name),
            Value::Plain(serde_json::Value::Object(object)) => {
                Ok(object.get(name).cloned().map(Value::Plain).unwrap_or_default())
            }
            Value::Bound(bound) => bound.resource().attribute(name),
            other => Err(Error::unknown_attribute(other.kind(), name)),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Plain(json) => write!(f, "{}", json),
            Value::Resource(resource) => write!(f, "Resource({})", resource.resource_type()),
            Value::List(list) => f.debug_list().entries(list.iter()).finish(),
            Value::Bound(bound) => write!(f, "Bound({})", bound.presenter().name()),
            Value::Opaque(_) => f.write_str("Opaque"),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::Plain(json)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Plain(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Plain(s.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Plain(b.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Plain(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Plain(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Plain(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Plain(n.into())
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

impl From<Arc<dyn Resource>> for Value {
    fn from(resource: Arc<dyn Resource>) -> Self {
        Value::Resource(resource)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(List::new(items))
    }
}

impl From<BoundPresenter> for Value {
    fn from(bound: BoundPresenter) -> Self {
        Value::Bound(Arc::new(bound))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// An ordered sequence of values.
///
/// A list may be tagged with the resource type of its elements; only tagged
/// lists can derive a (plural) root key.
#[derive(Clone, Default)]
pub struct List {
    element_type: Option<ResourceType>,
    items: Vec<Value>,
}

impl List {
    pub fn new<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            element_type: None,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// A list of resources of one type, e.g. the result of a query.
    pub fn of<I, V>(element_type: ResourceType, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            element_type: Some(element_type),
            ..Self::new(items)
        }
    }

    pub fn element_type(&self) -> Option<&ResourceType> {
        self.element_type.as_ref()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

/// Outcome of a property, link, or embed handler.
#[derive(Debug, Clone)]
pub enum Field {
    Value(Value),
    /// Leave the field out of the document.
    Omit,
}

/// Anything a field handler may return: a `Field`, or any value (which is
/// never omitted).
pub trait IntoField {
    fn into_field(self) -> Field;
}

impl IntoField for Field {
    fn into_field(self) -> Field {
        self
    }
}

impl<T: Into<Value>> IntoField for T {
    fn into_field(self) -> Field {
        Field::Value(self.into())
    }
}
