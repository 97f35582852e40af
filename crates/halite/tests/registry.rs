use halite::{
    Attributes, Dispatcher, Document, Error, List, NameDeriver, Options, Presenter,
    PresenterRegistry, Property, Record, Resource, ResourceType, Value,
};
use serde_json::json;
use std::sync::Arc;

struct Fixture {
    user_type: ResourceType,
    admin_type: ResourceType,
    user: Presenter,
    dispatcher: Dispatcher,
}

fn fixture() -> Fixture {
    let user_type = ResourceType::model("User");
    let admin_type = user_type.subtype("Admin");

    let mut user = Presenter::builder("UserPresenter");
    user.property("name", Property::new()).presents(&user_type);
    let user = user.build();

    let registry = PresenterRegistry::new();
    registry
        .register_presenter(&user)
        .expect("presenter declares its resource type");

    Fixture {
        user_type,
        admin_type,
        user,
        dispatcher: Dispatcher::new(Arc::new(registry)),
    }
}

#[test]
fn test_registered_presenter_is_used_by_default() -> anyhow::Result<()> {
    let fixture = fixture();
    let alice = Record::new(fixture.user_type.clone())
        .field("name", "Alice")
        .field("password", "secret");

    let presented = fixture.dispatcher.present(alice, Options::new())?;

    assert_eq!(presented, json!({"user": {"name": "Alice"}}));
    Ok(())
}

#[test]
fn test_subtypes_use_ancestor_presenter() -> anyhow::Result<()> {
    let fixture = fixture();
    let root = Record::new(fixture.admin_type.clone()).field("name", "Root");

    let presented = fixture.dispatcher.present(root, Options::new())?;

    assert_eq!(presented, json!({"admin": {"name": "Root"}}));
    let resolved = fixture.dispatcher.registry().resolve(&fixture.admin_type);
    assert!(resolved.is_some_and(|p| p.ptr_eq(&fixture.user)));
    Ok(())
}

#[test]
fn test_list_uses_plural_root() -> anyhow::Result<()> {
    let fixture = fixture();
    let users = List::of(
        fixture.user_type.clone(),
        ["Alice", "Bob"].map(|name| Record::new(fixture.user_type.clone()).field("name", name)),
    );

    let presented = fixture.dispatcher.present(users, Options::new())?;

    assert_eq!(
        presented,
        json!({"users": [{"name": "Alice"}, {"name": "Bob"}]})
    );
    Ok(())
}

#[test]
fn test_explicit_presenter_beats_registry() -> anyhow::Result<()> {
    let fixture = fixture();
    let mut shouty = Presenter::builder("ShoutyPresenter");
    shouty.property(
        "name",
        Property::new().handler(|scope| Ok(scope.get("name")?.as_str().map(str::to_uppercase))),
    );
    let shouty = shouty.build();
    let alice = Record::new(fixture.user_type.clone()).field("name", "Alice");

    let presented = fixture
        .dispatcher
        .present(alice, Options::new().with(&shouty))?;

    assert_eq!(presented, json!({"user": {"name": "ALICE"}}));
    Ok(())
}

#[test]
fn test_registry_beats_fallback() -> anyhow::Result<()> {
    let fixture = fixture();
    let mut other = Presenter::builder("OtherPresenter");
    other.property("kind", Property::new().handler(|_| Ok("other")));
    let dispatcher = fixture.dispatcher.clone().with_fallback(other.build());

    let alice = Record::new(fixture.user_type.clone()).field("name", "Alice");
    let widget = Record::new(ResourceType::model("Widget"));

    assert_eq!(
        dispatcher.present(alice, Options::new())?,
        json!({"user": {"name": "Alice"}})
    );
    assert_eq!(
        dispatcher.present(widget, Options::new())?,
        json!({"widget": {"kind": "other"}})
    );
    Ok(())
}

#[test]
fn test_raw_property_uses_registered_presenter() -> anyhow::Result<()> {
    let fixture = fixture();
    let team_type = ResourceType::model("Team");
    let mut team = Presenter::builder("TeamPresenter");
    team.properties(["title", "owner", "members"]);
    fixture.dispatcher.registry().register(&team_type, &team.build());

    let alice = Record::new(fixture.user_type.clone())
        .field("name", "Alice")
        .field("password", "secret");
    let unregistered = Record::new(ResourceType::model("Badge")).field("label", "gold");
    let crew = Record::new(team_type)
        .field("title", "Crew")
        .field("owner", alice.clone())
        .field("members", vec![alice.into_value(), unregistered.into_value()]);

    let presented = fixture.dispatcher.present(crew, Options::new())?;

    assert_eq!(
        presented,
        json!({
            "team": {
                "title": "Crew",
                "owner": {"name": "Alice"},
                "members": [{"name": "Alice"}, {"label": "gold"}]
            }
        })
    );
    Ok(())
}

#[test]
fn test_registered_presenter_sees_supplied_context() -> anyhow::Result<()> {
    let fixture = fixture();
    let todo_type = ResourceType::model("Todo");
    let mut todo = Presenter::builder("TodoPresenter");
    todo.properties(["description"]).property(
        "viewer",
        Property::new().handler(|scope| scope.context().get("name")),
    );
    fixture.dispatcher.registry().register(&todo_type, &todo.build());

    let mut owner = Presenter::builder("OwnerPresenter");
    owner.property("todo", Property::new());
    let walk = Record::new(todo_type).field("description", "Walk dog");
    let alice = Record::object().field("name", "Alice").field("todo", walk);
    let viewer = Record::object().field("name", "Admin");

    let presented = fixture.dispatcher.present(
        alice.clone(),
        Options::new().with(&owner.build()).context(viewer),
    )?;
    assert_eq!(
        presented,
        json!({"todo": {"description": "Walk dog", "viewer": "Admin"}})
    );

    let mut owner = Presenter::builder("OwnerPresenter");
    owner.property("todo", Property::new());
    let presented = fixture
        .dispatcher
        .present(alice, Options::new().with(&owner.build()))?;
    assert_eq!(
        presented,
        json!({"todo": {"description": "Walk dog", "viewer": null}})
    );
    Ok(())
}

#[test]
fn test_unregistered_resource_renders_raw() -> anyhow::Result<()> {
    let dispatcher = Dispatcher::default();
    let widget = Record::new(ResourceType::model("Widget")).field("size", 3);

    let presented = dispatcher.present(widget, Options::new())?;

    assert_eq!(presented, json!({"size": 3}));
    Ok(())
}

struct Socket;

impl Attributes for Socket {
    fn attribute(&self, name: &str) -> halite::Result<Value> {
        Err(Error::unknown_attribute("Socket", name))
    }
}

impl Resource for Socket {
    fn resource_type(&self) -> ResourceType {
        ResourceType::plain("Socket")
    }
}

#[test]
fn test_resource_without_document_is_unpresentable() {
    let err = Dispatcher::default()
        .present(Value::resource(Socket), Options::new())
        .unwrap_err();

    assert!(matches!(err, Error::Unpresentable(_)));
}

struct Fixed;

impl NameDeriver for Fixed {
    fn singular_name(&self, _resource_type: &ResourceType) -> Option<String> {
        Some("item".to_string())
    }

    fn plural_name(&self, _resource_type: &ResourceType) -> Option<String> {
        Some("items".to_string())
    }
}

#[test]
fn test_custom_name_deriver() -> anyhow::Result<()> {
    let fixture = fixture();
    let dispatcher = fixture.dispatcher.clone().with_names(Arc::new(Fixed));
    let alice = Record::new(fixture.user_type.clone()).field("name", "Alice");

    assert_eq!(
        dispatcher.present(alice.clone(), Options::new())?,
        json!({"item": {"name": "Alice"}})
    );
    assert_eq!(
        dispatcher.present(List::of(fixture.user_type.clone(), [alice]), Options::new())?,
        json!({"items": [{"name": "Alice"}]})
    );
    Ok(())
}

#[test]
fn test_concurrent_presentation() -> anyhow::Result<()> {
    let fixture = fixture();
    let guest_type = fixture.admin_type.subtype("Guest");
    let expected = json!({"guest": {"name": "Visitor"}});

    let results: Vec<halite::Result<Document>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dispatcher = &fixture.dispatcher;
                let guest_type = guest_type.clone();
                s.spawn(move || {
                    let guest = Record::new(guest_type).field("name", "Visitor");
                    dispatcher.present(guest, Options::new())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::handler("thread panicked")))
            })
            .collect()
    });

    for result in results {
        assert_eq!(result?, expected);
    }
    let resolved = fixture.dispatcher.registry().resolve(&guest_type);
    assert!(resolved.is_some_and(|p| p.ptr_eq(&fixture.user)));
    Ok(())
}

#[test]
fn test_reregistering_ancestor_reaches_cached_subtypes() -> anyhow::Result<()> {
    let fixture = fixture();
    let registry = fixture.dispatcher.registry();
    let admin = Record::new(fixture.admin_type.clone()).field("name", "Root");

    let presented = fixture.dispatcher.present(admin.clone(), Options::new())?;
    assert_eq!(presented, json!({"admin": {"name": "Root"}}));

    let mut shouting = Presenter::builder("ShoutingUserPresenter");
    shouting.property(
        "name",
        Property::new().handler(|scope| Ok(scope.get("name")?.as_str().map(str::to_uppercase))),
    );
    let shouting = shouting.build();
    registry.register(&fixture.user_type, &shouting);

    assert!(registry.resolve(&fixture.user_type).is_some_and(|p| p.ptr_eq(&shouting)));
    assert!(registry.resolve(&fixture.admin_type).is_some_and(|p| p.ptr_eq(&shouting)));
    assert_eq!(
        fixture.dispatcher.present(admin, Options::new())?,
        json!({"admin": {"name": "ROOT"}})
    );
    Ok(())
}
