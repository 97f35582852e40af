//! Root key derivation from resource type names.

use crate::resource::ResourceType;

/// Derives default root keys from resource types.
///
/// Returning `None` disables default root wrapping for that type.
pub trait NameDeriver: Send + Sync {
    fn singular_name(&self, resource_type: &ResourceType) -> Option<String>;
    fn plural_name(&self, resource_type: &ResourceType) -> Option<String>;
}

/// Model-style naming: `BlogPost` → `blog_post` / `blog_posts`.
///
/// Only model types have names; plain types never derive a root.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelNames;

impl NameDeriver for ModelNames {
    fn singular_name(&self, resource_type: &ResourceType) -> Option<String> {
        if !resource_type.is_model() {
            return None;
        }
        let singular = underscore(resource_type.name());
        (!singular.is_empty()).then_some(singular)
    }

    fn plural_name(&self, resource_type: &ResourceType) -> Option<String> {
        self.singular_name(resource_type).map(|name| pluralize(&name))
    }
}

// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
];

/// `Admin::BlogPost` → `admin_blog_post`, `HTTPServer` → `http_server`
pub fn underscore(name: &str) -> String {
    let chars: Vec<char> = name.replace("::", "_").chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let word_start = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            // Last capital of an acronym run starts the next word.
            let acronym_end = prev.is_some_and(char::is_uppercase)
                && next.is_some_and(|n| n.is_lowercase());
            if word_start || acronym_end {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c == '-' || c == ' ' {
            out.push('_');
        } else {
            out.push(c);
        }
    }

    out
}

/// English plural of a snake_case word; only the last segment is inflected.
pub fn pluralize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    };

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == last) {
        return format!("{}{}", head, plural);
    }

    let plural = if let Some(stem) = last.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
        && !stem.is_empty()
    {
        format!("{}ies", stem)
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| last.ends_with(suffix)) {
        format!("{}es", last)
    } else {
        format!("{}s", last)
    };

    format!("{}{}", head, plural)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("User"), "user");
        assert_eq!(underscore("BlogPost"), "blog_post");
        assert_eq!(underscore("Admin::User"), "admin_user");
        assert_eq!(underscore("Oauth2Token"), "oauth2_token");
        assert_eq!(underscore("HTTPServer"), "http_server");
        assert_eq!(underscore("APIKey"), "api_key");
        assert_eq!(underscore("UserAPI"), "user_api");
        assert_eq!(underscore("Admin::HTMLPage"), "admin_html_page");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("sales_person"), "sales_people");
        assert_eq!(pluralize("blog_post"), "blog_posts");
    }

    #[test]
    fn test_model_names_only_for_models() {
        let names = ModelNames;

        let user = ResourceType::model("User");
        assert_eq!(names.singular_name(&user).as_deref(), Some("user"));
        assert_eq!(names.plural_name(&user).as_deref(), Some("users"));

        let struct_type = ResourceType::plain("OpenStruct");
        assert_eq!(names.singular_name(&struct_type), None);
        assert_eq!(names.plural_name(&struct_type), None);
    }
}
