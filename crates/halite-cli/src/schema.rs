//! Builds live presenters and resource types from a `SchemaConfig`.

use crate::config::{EmbedConfig, LinkConfig, PresenterConfig, PropertyConfig, SchemaConfig};
use crate::template::Template;
use halite::{
    Dispatcher, Embed, Error, Link, Presenter, PresenterRegistry, Property, ResourceType, Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const SELF_REFERENCE: &str = "self";

/// Presenters and types declared by a schema file, with the registry of
/// default presenters already populated.
#[derive(Debug, Default)]
pub struct LoadedSchema {
    types: HashMap<String, ResourceType>,
    presenters: Vec<Presenter>,
    registry: Arc<PresenterRegistry>,
}

impl LoadedSchema {
    pub fn build(config: &SchemaConfig) -> Result<Self> {
        let mut schema = LoadedSchema::default();

        for ty in &config.types {
            if schema.types.contains_key(&ty.name) {
                return Err(configuration(format!("type '{}' is declared twice", ty.name)));
            }
            let resource_type = match &ty.parent {
                Some(parent) => schema.resource_type(parent)?.subtype(ty.name.clone()),
                None if ty.model => ResourceType::model(ty.name.clone()),
                None => ResourceType::plain(ty.name.clone()),
            };
            schema.types.insert(ty.name.clone(), resource_type);
        }

        for presenter in &config.presenters {
            if schema.find(&presenter.name).is_some() {
                return Err(configuration(format!(
                    "presenter '{}' is declared twice",
                    presenter.name
                )));
            }
            let built = schema.build_presenter(presenter)?;
            if built.resource_type().is_some() {
                schema.registry.register_presenter(&built)?;
            }
            debug!(
                presenter = built.name(),
                properties = built.definition().properties().len(),
                "declared presenter"
            );
            schema.presenters.push(built);
        }

        Ok(schema)
    }

    pub fn presenters(&self) -> &[Presenter] {
        &self.presenters
    }

    pub fn types(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.values()
    }

    pub fn find(&self, name: &str) -> Option<&Presenter> {
        self.presenters.iter().find(|p| p.name() == name)
    }

    pub fn presenter(&self, name: &str) -> Result<&Presenter> {
        self.find(name)
            .ok_or_else(|| configuration(format!("unknown presenter '{}'", name)))
    }

    pub fn resource_type(&self, name: &str) -> Result<&ResourceType> {
        self.types
            .get(name)
            .ok_or_else(|| configuration(format!("unknown resource type '{}'", name)))
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.registry.clone())
    }

    fn build_presenter(&self, config: &PresenterConfig) -> Result<Presenter> {
        let mut builder = match &config.extends {
            Some(parent) => self.presenter(parent)?.subtype(config.name.clone()),
            None => Presenter::builder(config.name.clone()),
        };

        if let Some(presents) = &config.presents {
            builder.presents(self.resource_type(presents)?);
        }
        builder.properties(config.properties.iter().cloned());
        for property in &config.property_specs {
            builder.property(property.name.clone(), self.property(property)?);
        }
        for link in &config.links {
            builder.link(link.rel.clone(), link_from(link));
        }
        for embed in &config.embeds {
            builder.embed(embed.name.clone(), self.embed(embed)?)?;
        }
        for let_config in &config.lets {
            let template = Template::parse(&let_config.template);
            builder.let_attribute(let_config.name.clone(), move |scope| template.render(scope));
        }

        Ok(builder.build())
    }

    fn property(&self, config: &PropertyConfig) -> Result<Property> {
        let mut property = Property::new();
        if config.ignore_nil {
            property = property.ignore_nil();
        }
        if let Some(with) = &config.with {
            property = match with.as_str() {
                SELF_REFERENCE => property.with_current(),
                name => property.with(self.presenter(name)?),
            };
        }
        if let Some(template) = &config.template {
            let template = Template::parse(template);
            property = property.handler(move |scope| template.render(scope));
        }
        Ok(property)
    }

    fn embed(&self, config: &EmbedConfig) -> Result<Embed> {
        let mut embed = Embed::new();
        if config.ignore_nil {
            embed = embed.ignore_nil();
        }
        if let Some(with) = &config.with {
            embed = match with.as_str() {
                SELF_REFERENCE => embed.with_current(),
                name => embed.with(self.presenter(name)?),
            };
        }
        if let Some(template) = &config.template {
            let template = Template::parse(template);
            embed = embed.handler(move |scope| template.render(scope));
        }
        Ok(embed)
    }
}

fn link_from(config: &LinkConfig) -> Link {
    let template = Template::parse(&config.href);
    let mut link = if template.is_literal() {
        Link::to(config.href.clone())
    } else {
        Link::new(move |scope| template.render(scope))
    };
    for (key, value) in &config.attributes {
        link = link.attribute(key.clone(), value.clone());
    }
    if config.ignore_nil {
        link = link.ignore_nil();
    }
    link
}

fn configuration(message: String) -> Error {
    Error::Configuration(message)
}
