use crate::dispatch::{Dispatcher, Options};
use crate::error::Result;
use crate::instance::BoundPresenter;
use crate::resource::ResourceType;
use crate::schema::{Embed, EmbedSpec, Entries, LetSpec, Link, LinkSpec, Property, PropertySpec};
use crate::scope::Scope;
use crate::value::{Document, Value};
use std::fmt;
use std::sync::Arc;

/// The schema of one presenter type: four independent namespaces of
/// declarations, in declaration order.
#[derive(Clone, Default)]
pub struct PresenterDefinition {
    name: String,
    resource_type: Option<ResourceType>,
    pub(crate) properties: Entries<PropertySpec>,
    pub(crate) links: Entries<LinkSpec>,
    pub(crate) embeds: Entries<EmbedSpec>,
    pub(crate) lets: Entries<LetSpec>,
}

impl PresenterDefinition {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Starting state of a subtype: a snapshot of the parent's four maps.
    /// Later changes to the parent are not seen by the child.
    fn inherit_from(parent: &PresenterDefinition, name: String) -> Self {
        Self {
            name,
            resource_type: None,
            properties: parent.properties.clone(),
            links: parent.links.clone(),
            embeds: parent.embeds.clone(),
            lets: parent.lets.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &Entries<PropertySpec> {
        &self.properties
    }

    pub fn links(&self) -> &Entries<LinkSpec> {
        &self.links
    }

    pub fn embeds(&self) -> &Entries<EmbedSpec> {
        &self.embeds
    }

    pub fn lets(&self) -> &Entries<LetSpec> {
        &self.lets
    }
}

/// A finished presenter type. Cheap to clone; immutable and shareable
/// across threads.
#[derive(Clone)]
pub struct Presenter(Arc<PresenterDefinition>);

impl Presenter {
    pub fn builder(name: impl Into<String>) -> PresenterBuilder {
        PresenterBuilder {
            definition: PresenterDefinition::new(name.into()),
        }
    }

    /// Start declaring a subtype of this presenter.
    pub fn subtype(&self, name: impl Into<String>) -> PresenterBuilder {
        PresenterBuilder {
            definition: PresenterDefinition::inherit_from(&self.0, name.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The resource type this presenter was declared to present, if any.
    pub fn resource_type(&self) -> Option<&ResourceType> {
        self.0.resource_type.as_ref()
    }

    pub fn definition(&self) -> &PresenterDefinition {
        &self.0
    }

    /// Bind this presenter to a resource, with default presentation options.
    pub fn bind(&self, resource: impl Into<Value>, defaults: Options) -> BoundPresenter {
        BoundPresenter::new(self.clone(), resource.into(), defaults)
    }

    /// Present a resource (or sequence), falling back to this presenter when
    /// the options name none. Uses an isolated dispatcher with an empty
    /// type registry.
    pub fn present(&self, resource: impl Into<Value>, options: Options) -> Result<Document> {
        Dispatcher::default()
            .with_fallback(self.clone())
            .present(resource, options)
    }

    pub fn ptr_eq(&self, other: &Presenter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let definition = &self.0;
        f.debug_struct("Presenter")
            .field("name", &definition.name)
            .field("properties", &definition.properties)
            .field("links", &definition.links)
            .field("embeds", &definition.embeds)
            .field("lets", &definition.lets)
            .finish()
    }
}

/// Mutable declaration phase of a presenter type.
///
/// Declarations only ever touch this builder's own definition; `build`
/// freezes a copy.
#[derive(Clone)]
pub struct PresenterBuilder {
    definition: PresenterDefinition,
}

impl PresenterBuilder {
    /// Derive a subtype from the current state of this builder. Declarations
    /// made here afterwards do not reach the subtype.
    pub fn subtype(&self, name: impl Into<String>) -> PresenterBuilder {
        PresenterBuilder {
            definition: PresenterDefinition::inherit_from(&self.definition, name.into()),
        }
    }

    pub fn property(&mut self, name: impl Into<String>, property: Property) -> &mut Self {
        self.definition
            .properties
            .insert(name.into(), property.into_spec());
        self
    }

    /// Declare several plain properties at once.
    pub fn properties<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.property(name, Property::new());
        }
        self
    }

    pub fn link(&mut self, rel: impl Into<String>, link: Link) -> &mut Self {
        self.definition.links.insert(rel.into(), link.into_spec());
        self
    }

    /// Declare the `self` link.
    pub fn self_link(&mut self, link: Link) -> &mut Self {
        self.link("self", link)
    }

    /// Fails with `Error::Configuration` when the embed has neither a
    /// handler nor a nested presenter.
    pub fn embed(&mut self, name: impl Into<String>, embed: Embed) -> Result<&mut Self> {
        let name = name.into();
        let spec = embed.into_spec(&name)?;
        self.definition.embeds.insert(name, spec);
        Ok(self)
    }

    /// Declare a virtual attribute.
    pub fn let_attribute<F, V>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Scope<'_>) -> Result<V> + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.definition.lets.insert(name.into(), LetSpec::new(f));
        self
    }

    /// Record the resource type this presenter presents by default. Register
    /// it with `PresenterRegistry::register_presenter`.
    pub fn presents(&mut self, resource_type: &ResourceType) -> &mut Self {
        self.definition.resource_type = Some(resource_type.clone());
        self
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn build(&self) -> Presenter {
        Presenter(Arc::new(self.definition.clone()))
    }
}
