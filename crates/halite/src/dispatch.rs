//! The presentation entry point: picks presenters, handles single values and
//! sequences uniformly, and applies root wrapping.

use crate::error::{Error, Result};
use crate::instance::{BoundPresenter, wrap};
use crate::names::{ModelNames, NameDeriver};
use crate::presenter::Presenter;
use crate::registry::PresenterRegistry;
use crate::resource::{Record, ResourceType};
use crate::value::{Document, List, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Root wrapping choice. Leaving it unset means "derive from the type".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    Key(String),
    Disabled,
}

/// Options for a single `present` call.
#[derive(Clone, Default)]
pub struct Options {
    root: Option<Root>,
    with: Option<Presenter>,
    context: Option<Value>,
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, key: impl Into<String>) -> Self {
        self.root = Some(Root::Key(key.into()));
        self
    }

    /// Never wrap the document, even if a root name could be derived.
    pub fn no_root(mut self) -> Self {
        self.root = Some(Root::Disabled);
        self
    }

    /// Present with this presenter instead of looking one up.
    pub fn with(mut self, presenter: &Presenter) -> Self {
        self.with = Some(presenter.clone());
        self
    }

    /// Value handed to every handler as its context.
    pub fn context(mut self, context: impl Into<Value>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Pass-through option for whatever encodes the document afterwards.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn root_option(&self) -> Option<&Root> {
        self.root.as_ref()
    }

    pub fn presenter(&self) -> Option<&Presenter> {
        self.with.as_ref()
    }

    pub fn context_value(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    pub fn extras(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.extra
    }

    pub fn take_context(&mut self) -> Option<Value> {
        self.context.take()
    }

    /// `self` overlaid with `other`; keys set in `other` win.
    pub fn merge(&self, other: &Options) -> Options {
        let mut extra = self.extra.clone();
        for (key, value) in &other.extra {
            extra.insert(key.clone(), value.clone());
        }

        Options {
            root: other.root.clone().or_else(|| self.root.clone()),
            with: other.with.clone().or_else(|| self.with.clone()),
            context: other.context.clone().or_else(|| self.context.clone()),
            extra,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("root", &self.root)
            .field("with", &self.with.as_ref().map(Presenter::name))
            .field("context", &self.context)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Decides which presenter handles a value and assembles the result.
///
/// Presenter choice for a single resource, in order: the `with` option, the
/// registry entry for the resource's type (or nearest ancestor), then the
/// dispatcher's fallback presenter. With none of those the value is rendered
/// raw.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<PresenterRegistry>,
    names: Arc<dyn NameDeriver>,
    fallback: Option<Presenter>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Arc::new(PresenterRegistry::new()))
    }
}

impl Dispatcher {
    pub fn new(registry: Arc<PresenterRegistry>) -> Self {
        Self {
            registry,
            names: Arc::new(ModelNames),
            fallback: None,
        }
    }

    pub fn with_names(mut self, names: Arc<dyn NameDeriver>) -> Self {
        self.names = names;
        self
    }

    pub fn with_fallback(mut self, presenter: Presenter) -> Self {
        self.fallback = Some(presenter);
        self
    }

    pub fn registry(&self) -> &PresenterRegistry {
        &self.registry
    }

    pub fn names(&self) -> &dyn NameDeriver {
        self.names.as_ref()
    }

    /// Present a resource, a sequence of resources, or a bound presenter.
    ///
    /// Plain values (scalars, and raw JSON when no presenter applies) come
    /// back unchanged and unwrapped.
    pub fn present(&self, resource: impl Into<Value>, options: Options) -> Result<Document> {
        match resource.into() {
            Value::Bound(bound) => bound.present(self, options),
            Value::List(list) => self.present_list(&list, options),
            Value::Plain(serde_json::Value::Array(items)) if self.has_presenter(&options) => {
                let list = List::new(items.into_iter().map(Value::materialize));
                self.present_list(&list, options)
            }
            Value::Plain(serde_json::Value::Object(object)) if self.has_presenter(&options) => {
                let record = Record::from_json(ResourceType::object(), object);
                self.present_single(record.into_value(), options)
            }
            Value::Plain(json) => Ok(json),
            resource @ Value::Resource(_) => self.present_single(resource, options),
            opaque @ Value::Opaque(_) => Err(Error::Unpresentable(opaque.kind().to_string())),
        }
    }

    /// Render a field value for output: plain values as they are, resources
    /// through their registered presenter (never the fallback), raw
    /// otherwise. Never root-wraps. A supplied `context` reaches every
    /// presenter involved.
    pub fn render(&self, value: &Value, context: Option<&Value>) -> Result<Document> {
        let options = match context {
            Some(context) => Options::new().no_root().context(context.clone()),
            None => Options::new().no_root(),
        };

        match value {
            Value::Plain(json) => Ok(json.clone()),
            Value::List(list) => list
                .iter()
                .map(|item| self.render(item, context))
                .collect::<Result<Vec<_>>>()
                .map(Document::Array),
            Value::Resource(resource) => match self.registry.resolve(&resource.resource_type()) {
                Some(presenter) => {
                    BoundPresenter::new(presenter, value.clone(), Options::new())
                        .present(self, options)
                }
                None => resource.to_document(),
            },
            Value::Bound(bound) => bound.present(self, options),
            Value::Opaque(_) => Err(Error::Unpresentable(value.kind().to_string())),
        }
    }

    fn has_presenter(&self, options: &Options) -> bool {
        options.with.is_some() || self.fallback.is_some()
    }

    fn present_list(&self, list: &List, options: Options) -> Result<Document> {
        let member_options = options.clone().no_root();
        let presented = list
            .iter()
            .map(|member| self.present(member.clone(), member_options.clone()))
            .collect::<Result<Vec<_>>>()?;

        let root = match options.root {
            Some(Root::Key(key)) => Some(key),
            Some(Root::Disabled) => None,
            None => list
                .element_type()
                .and_then(|ty| self.names.plural_name(ty)),
        };

        Ok(wrap(root, Document::Array(presented)))
    }

    fn present_single(&self, resource: Value, mut options: Options) -> Result<Document> {
        let resource_type = resource.resource_type();

        let presenter = match options.with.take() {
            Some(presenter) => Some(presenter),
            None => resource_type
                .as_ref()
                .and_then(|ty| self.registry.resolve(ty))
                .or_else(|| self.fallback.clone()),
        };

        let Some(presenter) = presenter else {
            debug!(resource_type = ?resource_type, "no presenter found, rendering raw");
            return resource.to_raw_document();
        };
        debug!(presenter = presenter.name(), resource_type = ?resource_type, "presenting resource");

        let root = match options.root.take() {
            Some(Root::Key(key)) => Some(key),
            Some(Root::Disabled) => None,
            None => resource_type
                .as_ref()
                .and_then(|ty| self.names.singular_name(ty)),
        };

        let instance = BoundPresenter::new(presenter, resource, Options::new());
        let presented = instance.present(self, options.no_root())?;

        Ok(wrap(root, presented))
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("fallback", &self.fallback.as_ref().map(Presenter::name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_call_options() {
        let defaults = Options::new().root("user").extra("pretty", true).context("a");
        let call = Options::new().no_root().extra("pretty", false);

        let merged = defaults.merge(&call);

        assert_eq!(merged.root_option(), Some(&Root::Disabled));
        assert_eq!(merged.extras()["pretty"], serde_json::json!(false));
        assert_eq!(merged.context_value().and_then(Value::as_str), Some("a"));
    }

    #[test]
    fn test_merge_keeps_defaults_for_unset_keys() {
        let presenter = Presenter::builder("P").build();
        let defaults = Options::new().with(&presenter).root("user");

        let merged = defaults.merge(&Options::new());

        assert_eq!(merged.root_option(), Some(&Root::Key("user".to_string())));
        assert!(merged.presenter().is_some_and(|p| p.ptr_eq(&presenter)));
    }

    #[test]
    fn test_plain_values_pass_through() {
        let dispatcher = Dispatcher::default();

        let presented = dispatcher
            .present(serde_json::json!({"name": "Stephen"}), Options::new())
            .unwrap();
        assert_eq!(presented, serde_json::json!({"name": "Stephen"}));

        let presented = dispatcher.present(42, Options::new().root("n")).unwrap();
        assert_eq!(presented, serde_json::json!(42));
    }

    #[test]
    fn test_opaque_values_are_unpresentable() {
        let err = Dispatcher::default()
            .present(Value::opaque(1u8), Options::new())
            .unwrap_err();
        assert!(matches!(err, Error::Unpresentable(_)));
    }
}
