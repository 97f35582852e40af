//! The host object model: resources, their runtime types, and a ready-made
//! open-struct resource (`Record`).

use crate::error::{Error, Result};
use crate::value::{Document, Value};
use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Anything that can answer attribute reads by name.
///
/// Implemented by resources, by the lets proxy, and by `Value` itself, so
/// handlers never need to know which of those they are reading from.
pub trait Attributes {
    fn attribute(&self, name: &str) -> Result<Value>;
}

/// A domain object that can be presented.
pub trait Resource: Attributes + Send + Sync {
    fn resource_type(&self) -> ResourceType;

    /// Raw rendering used when the resource is output without any presenter.
    fn to_document(&self) -> Result<Document> {
        Err(Error::Unpresentable(self.resource_type().name().to_string()))
    }
}

static OBJECT: Lazy<ResourceType> = Lazy::new(|| ResourceType::plain("Object"));

/// Runtime type of a resource.
///
/// Types compare by identity, not by name: two `ResourceType::model("User")`
/// calls produce unrelated types. A type may name a parent, which is the
/// ancestor chain walked when looking up a default presenter.
#[derive(Clone)]
pub struct ResourceType(Arc<TypeInfo>);

struct TypeInfo {
    name: String,
    model: bool,
    parent: Option<ResourceType>,
}

impl ResourceType {
    /// A model type; root keys are derived from its name.
    pub fn model(name: impl Into<String>) -> Self {
        Self::build(name.into(), true, None)
    }

    /// A type without a derivable root key.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::build(name.into(), false, None)
    }

    /// The shared type of records built from bare JSON objects.
    pub fn object() -> Self {
        OBJECT.clone()
    }

    /// Derive a child type. Model-ness is inherited from the parent.
    pub fn subtype(&self, name: impl Into<String>) -> Self {
        Self::build(name.into(), self.0.model, Some(self.clone()))
    }

    fn build(name: String, model: bool, parent: Option<ResourceType>) -> Self {
        Self(Arc::new(TypeInfo {
            name,
            model,
            parent,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn is_model(&self) -> bool {
        self.0.model
    }

    pub fn parent(&self) -> Option<&ResourceType> {
        self.0.parent.as_ref()
    }

    /// Parent, grandparent, ... nearest first. Does not include `self`.
    pub fn ancestors(&self) -> impl Iterator<Item = &ResourceType> {
        std::iter::successors(self.parent(), |ty| ty.parent())
    }

    pub fn is_a(&self, other: &ResourceType) -> bool {
        self == other || self.ancestors().any(|ty| ty == other)
    }
}

impl PartialEq for ResourceType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ResourceType {}

impl Hash for ResourceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceType").field(&self.0.name).finish()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// An open-struct resource: a typed bag of named fields.
///
/// Reading a field that was never set yields nil, unless the record is
/// strict, in which case it fails with `Error::UnknownAttribute`.
#[derive(Clone, Debug)]
pub struct Record {
    resource_type: ResourceType,
    fields: Vec<(String, Value)>,
    strict: bool,
}

impl Record {
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            fields: Vec::new(),
            strict: false,
        }
    }

    /// An untyped record, as produced from a bare JSON object.
    pub fn object() -> Self {
        Self::new(ResourceType::object())
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Build a record from a JSON object; nested objects become untyped
    /// records and arrays become lists.
    pub fn from_json(
        resource_type: ResourceType,
        object: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        let mut record = Self::new(resource_type);
        for (name, json) in object {
            record.set(name, Value::materialize(json));
        }
        record
    }

    pub fn into_value(self) -> Value {
        Value::resource(self)
    }
}

impl Attributes for Record {
    fn attribute(&self, name: &str) -> Result<Value> {
        match self.get(name) {
            Some(value) => Ok(value.clone()),
            None if self.strict => Err(Error::unknown_attribute(self.resource_type.name(), name)),
            None => Ok(Value::null()),
        }
    }
}

impl Resource for Record {
    fn resource_type(&self) -> ResourceType {
        self.resource_type.clone()
    }

    fn to_document(&self) -> Result<Document> {
        let mut object = serde_json::Map::new();
        for (name, value) in &self.fields {
            object.insert(name.clone(), value.to_raw_document()?);
        }
        Ok(Document::Object(object))
    }
}
