//! Declaration-side types: field specs and the option builders used to
//! declare them on a presenter.

use crate::error::{Error, Result};
use crate::presenter::Presenter;
use crate::scope::Scope;
use crate::value::{Field, IntoField, Value};
use std::fmt;
use std::sync::Arc;

/// Computes a property, link href, or embed.
pub type Handler = Arc<dyn Fn(&Scope<'_>) -> Result<Field> + Send + Sync>;

/// Computes a virtual attribute.
pub type LetHandler = Arc<dyn Fn(&Scope<'_>) -> Result<Value> + Send + Sync>;

fn handler<F, R>(f: F) -> Handler
where
    F: Fn(&Scope<'_>) -> Result<R> + Send + Sync + 'static,
    R: IntoField,
{
    Arc::new(move |scope: &Scope<'_>| f(scope).map(IntoField::into_field))
}

/// Insertion-ordered name → entry map.
///
/// Re-inserting an existing name replaces the entry in place, so a subtype
/// overriding a parent field keeps the parent's output position.
#[derive(Clone)]
pub struct Entries<T> {
    entries: Vec<(String, T)>,
}

impl<T> Entries<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: String, entry: T) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((name, entry)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Entries<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A nested presenter reference.
#[derive(Clone, Debug)]
pub enum PresenterRef {
    Presenter(Presenter),
    /// Whichever presenter is resolving the field; used for recursive
    /// schemas such as a user's friends.
    Current,
}

impl PresenterRef {
    pub fn resolve<'a>(&'a self, current: &'a Presenter) -> &'a Presenter {
        match self {
            PresenterRef::Presenter(presenter) => presenter,
            PresenterRef::Current => current,
        }
    }
}

impl From<&Presenter> for PresenterRef {
    fn from(presenter: &Presenter) -> Self {
        PresenterRef::Presenter(presenter.clone())
    }
}

impl From<Presenter> for PresenterRef {
    fn from(presenter: Presenter) -> Self {
        PresenterRef::Presenter(presenter)
    }
}

#[derive(Clone, Default)]
pub struct PropertySpec {
    pub(crate) handler: Option<Handler>,
    pub(crate) with: Option<PresenterRef>,
    pub(crate) ignore_nil: bool,
}

#[derive(Clone)]
pub struct LinkSpec {
    pub(crate) handler: Handler,
    pub(crate) attributes: serde_json::Map<String, serde_json::Value>,
    pub(crate) ignore_nil: bool,
}

#[derive(Clone)]
pub struct EmbedSpec {
    pub(crate) handler: Handler,
    pub(crate) ignore_nil: bool,
}

#[derive(Clone)]
pub struct LetSpec {
    pub(crate) handler: LetHandler,
}

impl PropertySpec {
    pub fn ignore_nil(&self) -> bool {
        self.ignore_nil
    }

    pub fn nested(&self) -> Option<&PresenterRef> {
        self.with.as_ref()
    }
}

impl LinkSpec {
    pub fn attributes(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.attributes
    }
}

/// Options for `PresenterBuilder::property`.
///
/// ```
/// use halite::{Presenter, Property};
///
/// let todo = Presenter::builder("TodoPresenter").build();
/// let mut user = Presenter::builder("UserPresenter");
/// user.property("email", Property::new().ignore_nil())
///     .property("todos", Property::new().with(&todo))
///     .property(
///         "screamed_name",
///         Property::new().handler(|scope| {
///             Ok(scope.get("name")?.as_str().map(str::to_uppercase))
///         }),
///     );
/// ```
#[derive(Clone, Default)]
pub struct Property {
    spec: PropertySpec,
}

impl Property {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present the value through another presenter.
    pub fn with(mut self, presenter: impl Into<PresenterRef>) -> Self {
        self.spec.with = Some(presenter.into());
        self
    }

    /// Present the value through whichever presenter is resolving the
    /// property, so a subtype recurses through itself.
    pub fn with_current(mut self) -> Self {
        self.spec.with = Some(PresenterRef::Current);
        self
    }

    pub fn ignore_nil(mut self) -> Self {
        self.spec.ignore_nil = true;
        self
    }

    pub fn handler<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&Scope<'_>) -> Result<R> + Send + Sync + 'static,
        R: IntoField,
    {
        self.spec.handler = Some(handler(f));
        self
    }

    pub(crate) fn into_spec(self) -> PropertySpec {
        self.spec
    }
}

/// Options for `PresenterBuilder::link`. A link always has a handler.
#[derive(Clone)]
pub struct Link {
    spec: LinkSpec,
}

impl Link {
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&Scope<'_>) -> Result<R> + Send + Sync + 'static,
        R: IntoField,
    {
        Self {
            spec: LinkSpec {
                handler: handler(f),
                attributes: serde_json::Map::new(),
                ignore_nil: false,
            },
        }
    }

    /// A link with a fixed href.
    pub fn to(href: impl Into<String>) -> Self {
        let href = href.into();
        Self::new(move |_| Ok(href.clone()))
    }

    /// Extra literal attribute emitted next to `href`, e.g. `templated`.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.spec.attributes.insert(name.into(), value.into());
        self
    }

    pub fn ignore_nil(mut self) -> Self {
        self.spec.ignore_nil = true;
        self
    }

    pub(crate) fn into_spec(self) -> LinkSpec {
        self.spec
    }
}

/// Options for `PresenterBuilder::embed`. Needs a handler, a nested
/// presenter, or both.
#[derive(Clone, Default)]
pub struct Embed {
    handler: Option<Handler>,
    with: Option<PresenterRef>,
    ignore_nil: bool,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, presenter: impl Into<PresenterRef>) -> Self {
        self.with = Some(presenter.into());
        self
    }

    /// See `Property::with_current`.
    pub fn with_current(mut self) -> Self {
        self.with = Some(PresenterRef::Current);
        self
    }

    pub fn ignore_nil(mut self) -> Self {
        self.ignore_nil = true;
        self
    }

    pub fn handler<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&Scope<'_>) -> Result<R> + Send + Sync + 'static,
        R: IntoField,
    {
        self.handler = Some(handler(f));
        self
    }

    /// Fold the nested presenter into the handler, so every `EmbedSpec`
    /// carries exactly one handler.
    pub(crate) fn into_spec(self, name: &str) -> Result<EmbedSpec> {
        let handler = match (self.handler, self.with) {
            (None, None) => {
                return Err(Error::Configuration(format!(
                    "embed '{}' needs a handler or a nested presenter",
                    name
                )));
            }
            (Some(handler), None) => handler,
            (source, Some(nested)) => {
                let name = name.to_string();
                Arc::new(move |scope: &Scope<'_>| {
                    let field = match &source {
                        Some(source) => source(scope)?,
                        None => Field::Value(scope.get(&name)?),
                    };
                    match field {
                        Field::Value(value) if !value.is_null() => {
                            scope.present_nested(&nested, value).map(Field::Value)
                        }
                        other => Ok(other),
                    }
                }) as Handler
            }
        };

        Ok(EmbedSpec {
            handler,
            ignore_nil: self.ignore_nil,
        })
    }
}

impl LetSpec {
    pub(crate) fn new<F, V>(f: F) -> Self
    where
        F: Fn(&Scope<'_>) -> Result<V> + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self {
            handler: Arc::new(move |scope: &Scope<'_>| f(scope).map(Into::into)),
        }
    }
}
