//! Hypermedia decoders
//!
//! Turns HAL and Siren JSON documents into `Representor` values. Relative
//! URIs are resolved against the URL the document was fetched from.

use super::error::HyperdriveError;
use super::representor::{InputProperty, Representor, Transition, SELF_RELATION};
use serde_json::Value;
use url::Url;

pub const SIREN_MEDIA_TYPE: &str = "application/vnd.siren+json";
pub const HAL_MEDIA_TYPE: &str = "application/hal+json";
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Accept header advertising every format we can decode, preferred first
pub const ACCEPT: &str = "application/vnd.siren+json, application/hal+json, application/json";

/// Decode a response body according to its content type
pub fn parse(content_type: &str, body: &str, base: &Url) -> Result<Representor, HyperdriveError> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    let is_siren = media_type == SIREN_MEDIA_TYPE;
    let is_hal = media_type == HAL_MEDIA_TYPE || media_type == JSON_MEDIA_TYPE;

    if !is_siren && !is_hal {
        return Err(HyperdriveError::UnsupportedContentType(media_type));
    }

    if body.trim().is_empty() {
        return Ok(Representor::new());
    }

    let document: Value =
        serde_json::from_str(body).map_err(|e| HyperdriveError::Decode(e.to_string()))?;

    if !document.is_object() {
        return Err(HyperdriveError::Decode(
            "document root is not an object".to_string(),
        ));
    }

    if is_siren {
        Ok(parse_siren(&document, base))
    } else {
        Ok(parse_hal(&document, base))
    }
}

// =========================================================================
// HAL
// =========================================================================

/// Decode a HAL document
pub fn parse_hal(document: &Value, base: &Url) -> Representor {
    let mut representor = Representor::new();
    let Some(object) = document.as_object() else {
        return representor;
    };

    for (key, value) in object {
        if !key.starts_with('_') {
            representor.attributes.insert(key.clone(), value.clone());
        }
    }

    if let Some(links) = object.get("_links").and_then(|v| v.as_object()) {
        for (relation, link) in links {
            if relation == "curies" {
                continue;
            }
            // A relation may hold several links; only the first becomes a transition
            let link = match link {
                Value::Array(items) => items.first(),
                other => Some(other),
            };
            if let Some(transition) = link.and_then(|l| hal_link_transition(l, base)) {
                representor.transitions.insert(relation.clone(), transition);
            }
        }
    }

    if let Some(embedded) = object.get("_embedded").and_then(|v| v.as_object()) {
        for (relation, resources) in embedded {
            let children: Vec<Representor> = match resources {
                Value::Array(items) => items
                    .iter()
                    .filter(|item| item.is_object())
                    .map(|item| parse_hal(item, base))
                    .collect(),
                Value::Object(_) => vec![parse_hal(resources, base)],
                _ => continue,
            };
            representor
                .representors
                .entry(relation.clone())
                .or_default()
                .extend(children);
        }
    }

    representor
}

fn hal_link_transition(link: &Value, base: &Url) -> Option<Transition> {
    let href = link.get("href")?.as_str()?;
    let templated = link
        .get("templated")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let mut transition = Transition::new(&resolve_uri(base, href));

    if let Some(media_type) = link.get("type").and_then(|v| v.as_str()) {
        transition.suggested_content_types.push(media_type.to_string());
    }

    if templated {
        for name in template_variables(href) {
            transition
                .parameters
                .insert(name, InputProperty::default());
        }
    }

    Some(transition)
}

// =========================================================================
// Siren
// =========================================================================

/// Decode a Siren entity
pub fn parse_siren(document: &Value, base: &Url) -> Representor {
    let mut representor = Representor::new();

    if let Some(properties) = document.get("properties").and_then(|v| v.as_object()) {
        for (key, value) in properties {
            representor.attributes.insert(key.clone(), value.clone());
        }
    }

    if let Some(entities) = document.get("entities").and_then(|v| v.as_array()) {
        for entity in entities {
            let Some(relation) = first_rel(entity) else {
                continue;
            };

            // Embedded links only carry an href; anything else is a full sub-entity
            let child = match entity.get("href").and_then(|v| v.as_str()) {
                Some(href) if entity.get("properties").is_none() => Representor::new()
                    .with_transition(SELF_RELATION, Transition::new(&resolve_uri(base, href))),
                _ => parse_siren(entity, base),
            };

            representor
                .representors
                .entry(relation)
                .or_default()
                .push(child);
        }
    }

    if let Some(links) = document.get("links").and_then(|v| v.as_array()) {
        for link in links {
            let Some(href) = link.get("href").and_then(|v| v.as_str()) else {
                continue;
            };
            let uri = resolve_uri(base, href);
            for relation in rels(link) {
                representor
                    .transitions
                    .insert(relation, Transition::new(&uri));
            }
        }
    }

    if let Some(actions) = document.get("actions").and_then(|v| v.as_array()) {
        for action in actions {
            if let Some((name, transition)) = siren_action(action, base) {
                representor.transitions.insert(name, transition);
            }
        }
    }

    representor
}

fn siren_action(action: &Value, base: &Url) -> Option<(String, Transition)> {
    let name = action.get("name")?.as_str()?;
    let href = action.get("href")?.as_str()?;
    let method = action
        .get("method")
        .and_then(|v| v.as_str())
        .unwrap_or("GET");

    let mut transition = Transition::new(&resolve_uri(base, href)).with_method(method);

    if let Some(media_type) = action.get("type").and_then(|v| v.as_str()) {
        transition.suggested_content_types.push(media_type.to_string());
    }

    let is_query = transition.method == "GET";

    for field in action
        .get("fields")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
    {
        let Some(field_name) = field.get("name").and_then(|v| v.as_str()) else {
            continue;
        };
        let property = InputProperty {
            title: field.get("title").and_then(|v| v.as_str()).map(String::from),
            value: field.get("value").cloned(),
            default_value: None,
            // Not in core Siren, but common in the wild
            required: field
                .get("required")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        };
        if is_query {
            transition.parameters.insert(field_name.to_string(), property);
        } else {
            transition.attributes.insert(field_name.to_string(), property);
        }
    }

    Some((name.to_string(), transition))
}

fn rels(value: &Value) -> Vec<String> {
    match value.get("rel") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn first_rel(value: &Value) -> Option<String> {
    rels(value).into_iter().next()
}

// =========================================================================
// URI helpers
// =========================================================================

/// Resolve a possibly relative href against the document URL.
///
/// Template expressions (`{...}`) are kept verbatim; only the literal prefix
/// before the first expression goes through URL resolution.
pub fn resolve_uri(base: &Url, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }

    let (prefix, template) = match href.find('{') {
        Some(idx) => href.split_at(idx),
        None => (href, ""),
    };

    match base.join(prefix) {
        Ok(url) => format!("{}{}", url, template),
        Err(_) => href.to_string(),
    }
}

/// Names of all variables in a URI template, in order of appearance
pub fn template_variables(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    for expression in template_expressions(template) {
        let body = expression.trim_start_matches(['+', '#', '.', '/', ';', '?', '&']);
        for variable in body.split(',') {
            let name = variable
                .split(':')
                .next()
                .unwrap_or("")
                .trim_end_matches('*')
                .trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Raw `{...}` expression bodies in a template
pub(crate) fn template_expressions(template: &str) -> Vec<&str> {
    let mut expressions = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        expressions.push(&after[..end]);
        rest = &after[end + 1..];
    }
    expressions
}
