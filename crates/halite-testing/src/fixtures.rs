//! Sample presenters and resources.
//!
//! The catalog mirrors a small document store: users with friends and
//! documents, documents with related documents. Resource types compare by
//! identity, so every test should take its types and presenters from one
//! `Catalog`.

use chrono::{DateTime, SecondsFormat};
use halite::{List, Presenter, Property, Record, ResourceType, Value};

pub const UPDATED_AT: i64 = 1381734000;
pub const CREATED_AT: i64 = 1381834000;

/// RFC 3339 timestamp for a unix time, nil when out of range.
pub fn timestamp(secs: i64) -> Value {
    DateTime::from_timestamp(secs, 0)
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true))
        .into()
}

pub struct Catalog {
    pub user_type: ResourceType,
    pub document_type: ResourceType,
    pub user_presenter: Presenter,
    pub document_presenter: Presenter,
    /// Snapshot of the document presenter taken before it declared
    /// `related_documents`.
    pub related_document_presenter: Presenter,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        let user_type = ResourceType::model("User");
        let document_type = ResourceType::model("Document");

        let mut document = Presenter::builder("DocumentPresenter");
        document
            .properties(["name", "path", "content_type"])
            .property("updated_at", Property::new().handler(|_| Ok(timestamp(UPDATED_AT))))
            .property("created_at", Property::new().handler(|_| Ok(timestamp(CREATED_AT))));
        let related_document_presenter = document.subtype("RelatedDocumentPresenter").build();
        document.property(
            "related_documents",
            Property::new().with(&related_document_presenter),
        );
        let document_presenter = document.build();

        let mut user = Presenter::builder("UserPresenter");
        user.properties(["name", "age"])
            .property(
                "location",
                Property::new().handler(|_| Ok("37.788079, -122.401288")),
            )
            .property("updated_at", Property::new().handler(|_| Ok(timestamp(UPDATED_AT))))
            .property("created_at", Property::new().handler(|_| Ok(timestamp(CREATED_AT))))
            .property("friends", Property::new().with_current())
            .property("documents", Property::new().with(&document_presenter));
        let user_presenter = user.build();

        Self {
            user_type,
            document_type,
            user_presenter,
            document_presenter,
            related_document_presenter,
        }
    }

    pub fn document(&self, index: usize, related: Vec<Value>) -> Value {
        Record::new(self.document_type.clone())
            .field("name", format!("Document {}", index))
            .field("path", format!("/documents/{}", index))
            .field("content_type", "text/html")
            .field(
                "related_documents",
                List::of(self.document_type.clone(), related),
            )
            .into_value()
    }

    pub fn user(&self, name: &str, age: i64, friends: Vec<Value>, documents: Vec<Value>) -> Value {
        Record::new(self.user_type.clone())
            .field("name", name)
            .field("age", age)
            .field("friends", List::of(self.user_type.clone(), friends))
            .field("documents", List::of(self.document_type.clone(), documents))
            .into_value()
    }

    /// Ten documents; document `i` is related to document `(10 - i) % 10`.
    pub fn documents(&self) -> Vec<Value> {
        let plain: Vec<Value> = (0..10).map(|i| self.document(i, Vec::new())).collect();
        (0..10)
            .map(|i| self.document(i, vec![plain[(10 - i) % 10].clone()]))
            .collect()
    }

    /// Four users with overlapping friends and documents.
    pub fn users(&self) -> List {
        let documents = self.documents();

        let david = self.user("David", 26, vec![], documents[0..=5].to_vec());
        let julie = self.user("Julie", 29, vec![david.clone()], documents[3..=8].to_vec());
        let thomas = self.user(
            "Thomas",
            28,
            vec![david.clone(), julie.clone()],
            documents[6..=9].to_vec(),
        );
        let alfred = self.user(
            "Alfred",
            24,
            vec![david.clone(), julie.clone(), thomas.clone()],
            vec![],
        );

        List::of(self.user_type.clone(), vec![david, julie, thomas, alfred])
    }
}
