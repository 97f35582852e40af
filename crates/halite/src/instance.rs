use crate::dispatch::{Dispatcher, Options, Root};
use crate::error::Result;
use crate::lets::LetsProxy;
use crate::presenter::Presenter;
use crate::resource::Attributes;
use crate::scope::Scope;
use crate::value::{Document, Field, Value};
use serde_json::Map;
use tracing::trace;

/// A presenter bound to one resource: the per-call presenter instance.
#[derive(Clone, Debug)]
pub struct BoundPresenter {
    presenter: Presenter,
    resource: Value,
    defaults: Options,
}

impl BoundPresenter {
    pub fn new(presenter: Presenter, resource: Value, defaults: Options) -> Self {
        Self {
            presenter,
            resource,
            defaults,
        }
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn resource(&self) -> &Value {
        &self.resource
    }

    /// Resolve the bound resource against the presenter's schema.
    ///
    /// Call options win over the defaults given at bind time. Without an
    /// explicit root option the document is wrapped in the singular name of
    /// the resource's type, when the dispatcher can derive one.
    pub fn present(&self, dispatcher: &Dispatcher, options: Options) -> Result<Document> {
        let mut options = self.defaults.merge(&options);
        let context = options.take_context();
        let definition = self.presenter.definition();

        let proxy;
        let target: &dyn Attributes = if definition.lets.is_empty() {
            &self.resource
        } else {
            proxy = LetsProxy::new(
                &self.resource,
                &definition.lets,
                context.as_ref(),
                dispatcher,
                &self.presenter,
            );
            &proxy
        };
        let scope = Scope::new(target, context.as_ref(), dispatcher, &self.presenter);

        let mut presented = self.properties(&scope)?;
        let links = self.links(&scope)?;
        if !links.is_empty() {
            presented.insert("_links".to_string(), Document::Object(links));
        }
        let embedded = self.embedded(&scope)?;
        if !embedded.is_empty() {
            presented.insert("_embedded".to_string(), Document::Object(embedded));
        }

        let root = match options.root_option() {
            Some(Root::Key(key)) => Some(key.clone()),
            Some(Root::Disabled) => None,
            None => self
                .resource
                .resource_type()
                .and_then(|ty| dispatcher.names().singular_name(&ty)),
        };

        Ok(wrap(root, Document::Object(presented)))
    }

    fn properties(&self, scope: &Scope<'_>) -> Result<Map<String, Document>> {
        let mut props = Map::new();

        for (name, spec) in self.presenter.definition().properties.iter() {
            let field = match &spec.handler {
                Some(handler) => handler(scope)?,
                None => Field::Value(scope.get(name)?),
            };
            let Some(value) = self.keep(name, field, spec.ignore_nil) else {
                continue;
            };

            let value = match &spec.with {
                Some(nested) if !value.is_null() => scope.present_nested(nested, value)?,
                _ => value,
            };
            props.insert(name.to_string(), scope.render(&value)?);
        }

        Ok(props)
    }

    fn links(&self, scope: &Scope<'_>) -> Result<Map<String, Document>> {
        let mut links = Map::new();

        for (rel, spec) in self.presenter.definition().links.iter() {
            let field = (spec.handler)(scope)?;
            let Some(href) = self.keep(rel, field, spec.ignore_nil) else {
                continue;
            };

            let mut link = Map::new();
            link.insert("href".to_string(), scope.render(&href)?);
            for (key, value) in &spec.attributes {
                link.insert(key.clone(), value.clone());
            }
            links.insert(rel.to_string(), Document::Object(link));
        }

        Ok(links)
    }

    fn embedded(&self, scope: &Scope<'_>) -> Result<Map<String, Document>> {
        let mut embedded = Map::new();

        for (name, spec) in self.presenter.definition().embeds.iter() {
            let field = (spec.handler)(scope)?;
            let Some(value) = self.keep(name, field, spec.ignore_nil) else {
                continue;
            };
            embedded.insert(name.to_string(), scope.render(&value)?);
        }

        Ok(embedded)
    }

    /// Either an explicit omission or `ignore_nil` with a nil value drops
    /// the field.
    fn keep(&self, name: &str, field: Field, ignore_nil: bool) -> Option<Value> {
        match field {
            Field::Omit => {
                trace!(presenter = self.presenter.name(), field = name, "field omitted by handler");
                None
            }
            Field::Value(value) if ignore_nil && value.is_null() => {
                trace!(presenter = self.presenter.name(), field = name, "nil field ignored");
                None
            }
            Field::Value(value) => Some(value),
        }
    }
}

pub(crate) fn wrap(root: Option<String>, document: Document) -> Document {
    match root {
        Some(key) => {
            let mut wrapped = Map::new();
            wrapped.insert(key, document);
            Document::Object(wrapped)
        }
        None => document,
    }
}
