use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::presenter::Presenter;
use crate::resource::Attributes;
use crate::schema::{Entries, LetSpec};
use crate::scope::Scope;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Resolution target for presenters that declare virtual attributes.
///
/// A virtual attribute is computed on first read and memoized for the rest
/// of the presentation, failures included; every other read is forwarded to the resource. Let
/// handlers run with the proxy as their target, so they can read sibling
/// lets and real attributes alike.
///
/// One proxy is built per presentation and never shared.
pub(crate) struct LetsProxy<'a> {
    resource: &'a Value,
    lets: &'a Entries<LetSpec>,
    context: Option<&'a Value>,
    dispatcher: &'a Dispatcher,
    presenter: &'a Presenter,
    memoized: RefCell<HashMap<String, Result<Value>>>,
    evaluating: RefCell<HashSet<String>>,
}

impl<'a> LetsProxy<'a> {
    pub(crate) fn new(
        resource: &'a Value,
        lets: &'a Entries<LetSpec>,
        context: Option<&'a Value>,
        dispatcher: &'a Dispatcher,
        presenter: &'a Presenter,
    ) -> Self {
        Self {
            resource,
            lets,
            context,
            dispatcher,
            presenter,
            memoized: RefCell::new(HashMap::new()),
            evaluating: RefCell::new(HashSet::new()),
        }
    }

    fn evaluate(&self, name: &str, spec: &LetSpec) -> Result<Value> {
        if !self.evaluating.borrow_mut().insert(name.to_string()) {
            return Err(Error::CyclicAttribute(name.to_string()));
        }

        let scope = Scope::new(self, self.context, self.dispatcher, self.presenter);
        let result = (spec.handler)(&scope);
        self.evaluating.borrow_mut().remove(name);

        self.memoized
            .borrow_mut()
            .insert(name.to_string(), result.clone());
        result
    }
}

impl Attributes for LetsProxy<'_> {
    fn attribute(&self, name: &str) -> Result<Value> {
        let Some(spec) = self.lets.get(name) else {
            return self.resource.attribute(name);
        };

        let cached = self.memoized.borrow().get(name).cloned();
        match cached {
            Some(result) => result,
            None => self.evaluate(name, spec),
        }
    }
}
