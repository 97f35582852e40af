//! A tiny HAL-flavoured presenter.
//!
//! A presenter declares which attributes of a resource to expose
//! (properties), which hyperlinks to emit (`_links`), which related
//! resources to nest (`_embedded`), and memoized computed attributes
//! (lets). The dispatcher resolves live resources against those schemas and
//! returns a `serde_json::Value` document ready for encoding.
//!
//! ```
//! use halite::{Embed, Link, Options, Presenter, Property, Record, ResourceType};
//! use serde_json::json;
//!
//! let mut todo = Presenter::builder("TodoPresenter");
//! todo.property("description", Property::new());
//! let todo = todo.build();
//!
//! let mut user = Presenter::builder("UserPresenter");
//! user.property("name", Property::new())
//!     .link("todos", Link::new(|scope| Ok(format!("/users/{:?}/todos", scope.get("id")?))))
//!     .embed("todos", Embed::new().with(&todo))?;
//! let user = user.build();
//!
//! let stephen = Record::new(ResourceType::model("User"))
//!     .field("id", 1)
//!     .field("name", "Stephen")
//!     .field("todos", vec![Record::object().field("description", "Buy milk").into_value()]);
//!
//! let presented = user.present(stephen, Options::new())?;
//! assert_eq!(
//!     presented,
//!     json!({
//!         "user": {
//!             "name": "Stephen",
//!             "_links": {"todos": {"href": "/users/1/todos"}},
//!             "_embedded": {"todos": [{"description": "Buy milk"}]}
//!         }
//!     })
//! );
//! # Ok::<(), halite::Error>(())
//! ```

mod dispatch;
pub mod error;
mod instance;
mod lets;
pub mod names;
mod presenter;
mod registry;
mod resource;
mod schema;
mod scope;
mod value;

pub use dispatch::{Dispatcher, Options, Root};
pub use error::{Error, Result};
pub use instance::BoundPresenter;
pub use names::{ModelNames, NameDeriver};
pub use presenter::{Presenter, PresenterBuilder, PresenterDefinition};
pub use registry::PresenterRegistry;
pub use resource::{Attributes, Record, Resource, ResourceType};
pub use schema::{
    Embed, EmbedSpec, Entries, Handler, LetHandler, LetSpec, Link, LinkSpec, PresenterRef,
    Property, PropertySpec,
};
pub use scope::{Context, Scope};
pub use value::{Document, Field, IntoField, List, Value};
