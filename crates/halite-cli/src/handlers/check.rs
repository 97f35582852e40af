use crate::schema::LoadedSchema;
use anyhow::Result;

pub fn handle(schema: &LoadedSchema) -> Result<()> {
    for presenter in schema.presenters() {
        let definition = presenter.definition();
        let presents = presenter
            .resource_type()
            .map(|ty| format!(" (presents {})", ty))
            .unwrap_or_default();

        println!(
            "{}{}: {} properties, {} links, {} embeds, {} lets",
            presenter.name(),
            presents,
            definition.properties().len(),
            definition.links().len(),
            definition.embeds().len(),
            definition.lets().len(),
        );
    }

    println!(
        "Schema OK: {} types, {} presenters",
        schema.types().count(),
        schema.presenters().len()
    );

    Ok(())
}
