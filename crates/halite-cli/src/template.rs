//! String templates for schema-declared values.
//!
//! `{name}` reads an attribute through the resolution target, `{@name}`
//! reads from the context, and dotted paths (`{author.name}`) walk nested
//! resources. Anything else in braces, such as the URI-template expressions
//! `{?q}` or `{/path}`, is kept literally.

use halite::{Attributes, Error, Result, Scope, Value};
use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(@?)([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\}").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Attribute(Vec<String>),
    Context(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(source) {
            let (Some(whole), Some(path)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(source[last..whole.start()].to_string()));
            }

            let path = path.as_str().split('.').map(str::to_string).collect();
            let from_context = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            segments.push(if from_context {
                Segment::Context(path)
            } else {
                Segment::Attribute(path)
            });
            last = whole.end();
        }

        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the template has no placeholders.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    /// Evaluate against the current presentation.
    ///
    /// A template that is exactly one placeholder yields the attribute value
    /// itself (a number, a list, a resource). Otherwise the result is a
    /// string, or nil as soon as any placeholder is nil.
    pub fn render(&self, scope: &Scope<'_>) -> Result<Value> {
        if let [single] = self.segments.as_slice()
            && !matches!(single, Segment::Literal(_))
        {
            return self.lookup(single, scope);
        }

        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            if let Segment::Literal(text) = segment {
                out.push_str(text);
                continue;
            }

            let value = self.lookup(segment, scope)?;
            match value.as_json() {
                Some(serde_json::Value::Null) => return Ok(Value::null()),
                Some(serde_json::Value::String(text)) => out.push_str(text),
                Some(json @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => {
                    out.push_str(&json.to_string())
                }
                _ => {
                    return Err(Error::handler(format!(
                        "cannot interpolate {} into template '{}'",
                        value.kind(),
                        self.source
                    )));
                }
            }
        }

        Ok(Value::from(out))
    }

    fn lookup(&self, segment: &Segment, scope: &Scope<'_>) -> Result<Value> {
        let (path, from_context) = match segment {
            Segment::Attribute(path) => (path, false),
            Segment::Context(path) => (path, true),
            Segment::Literal(text) => return Ok(Value::from(text.as_str())),
        };

        let Some((first, rest)) = path.split_first() else {
            return Ok(Value::null());
        };
        let mut value = if from_context {
            scope.context().get(first)?
        } else {
            scope.get(first)?
        };
        for name in rest {
            if value.is_null() {
                break;
            }
            value = value.attribute(name)?;
        }

        Ok(value)
    }
}
