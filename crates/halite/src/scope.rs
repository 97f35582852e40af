use crate::dispatch::{Dispatcher, Options};
use crate::error::Result;
use crate::presenter::Presenter;
use crate::resource::Attributes;
use crate::schema::PresenterRef;
use crate::value::{Document, Value};
use std::any::Any;

/// What a handler sees while one resource is being presented.
///
/// Attribute reads go through the resolution target: the lets proxy when the
/// presenter declares virtual attributes, otherwise the resource itself.
pub struct Scope<'a> {
    target: &'a dyn Attributes,
    context: Option<&'a Value>,
    dispatcher: &'a Dispatcher,
    presenter: &'a Presenter,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        target: &'a dyn Attributes,
        context: Option<&'a Value>,
        dispatcher: &'a Dispatcher,
        presenter: &'a Presenter,
    ) -> Self {
        Self {
            target,
            context,
            dispatcher,
            presenter,
        }
    }

    /// Read an attribute (or virtual attribute) of the resource.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.target.attribute(name)
    }

    /// The caller supplied context, or the resolution target when none was
    /// given.
    pub fn context(&self) -> Context<'a> {
        match self.context {
            Some(value) => Context::Supplied(value),
            None => Context::Target(self.target),
        }
    }

    pub fn presenter(&self) -> &'a Presenter {
        self.presenter
    }

    pub fn dispatcher(&self) -> &'a Dispatcher {
        self.dispatcher
    }

    /// Present another value from inside a handler; the result is a plain
    /// document value.
    pub fn present(&self, value: impl Into<Value>, options: Options) -> Result<Value> {
        self.dispatcher.present(value, options).map(Value::Plain)
    }

    /// Render a field value, carrying a supplied context into any presenter
    /// the dispatcher picks for it.
    pub(crate) fn render(&self, value: &Value) -> Result<Document> {
        self.dispatcher.render(value, self.context)
    }

    /// Present `value` through a nested presenter without root wrapping,
    /// passing a supplied context through.
    pub(crate) fn present_nested(&self, nested: &PresenterRef, value: Value) -> Result<Value> {
        let mut options = Options::new()
            .with(nested.resolve(self.presenter))
            .no_root();
        if let Some(context) = self.context {
            options = options.context(context.clone());
        }
        self.present(value, options)
    }
}

/// The context argument handed to every handler.
#[derive(Clone, Copy)]
pub enum Context<'a> {
    Supplied(&'a Value),
    /// No context was supplied; the resolution target stands in for it.
    Target(&'a dyn Attributes),
}

impl<'a> Context<'a> {
    pub fn get(&self, name: &str) -> Result<Value> {
        match self {
            Context::Supplied(value) => value.attribute(name),
            Context::Target(target) => target.attribute(name),
        }
    }

    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Context::Supplied(value) => Some(value),
            Context::Target(_) => None,
        }
    }

    /// Downcast an opaque context payload, e.g. a URL helper.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value().and_then(|value| value.downcast_ref::<T>())
    }
}
