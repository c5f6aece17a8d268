//! HTTP utilities for hypermedia API calls

use super::error::HyperdriveError;
use super::parser::{self, template_expressions, ACCEPT, JSON_MEDIA_TYPE};
use super::representor::{display_value, Representor, Transition, TransitionInput};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT as ACCEPT_HEADER, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper that decodes every response into a `Representor`
#[derive(Clone)]
pub struct HyperdriveHttpClient {
    client: Client,
}

impl HyperdriveHttpClient {
    /// Create a new HTTP client sending `headers` with every request
    pub fn new(headers: &[(String, String)]) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT_HEADER, HeaderValue::from_static(ACCEPT));

        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name: {}", name))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {}", name))?;
            default_headers.insert(name, value);
        }

        let client = Client::builder()
            .user_agent(format!("starship/{}", crate::VERSION))
            .default_headers(default_headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Send a request and decode the response document
    pub async fn send(
        &self,
        method: &str,
        url: Url,
        body: Option<&Value>,
    ) -> std::result::Result<Representor, HyperdriveError> {
        tracing::debug!("{} {}", method, url);

        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| HyperdriveError::InvalidMethod(method.to_string()))?;

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HyperdriveError::Network(e.to_string()))?;

        let status = response.status();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(JSON_MEDIA_TYPE)
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| HyperdriveError::Network(e.to_string()))?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(HyperdriveError::Http {
                status: status.as_u16(),
            });
        }

        parser::parse(&content_type, &body, &final_url).inspect_err(|e| {
            tracing::warn!("Failed to decode {} from {}: {}", content_type, final_url, e);
        })
    }
}

/// Resolve parameter values for a transition: user input first, then the
/// property's own value or default. Undeclared input parameters are kept.
fn parameter_values(transition: &Transition, input: &TransitionInput) -> BTreeMap<String, String> {
    let mut values: BTreeMap<String, String> = transition
        .parameters
        .iter()
        .filter_map(|(name, property)| {
            input
                .parameters
                .get(name)
                .cloned()
                .or_else(|| property.effective_value().map(display_value))
                .map(|value| (name.clone(), value))
        })
        .collect();

    for (name, value) in &input.parameters {
        values.entry(name.clone()).or_insert_with(|| value.clone());
    }

    values
}

/// Build the request URL for a transition.
///
/// `{name}`, `{/name}` and `{.name}` expressions are filled with
/// percent-encoded values, `{;name}` becomes `;name=value` and `{?a,b}` and
/// `{&a,b}` become query pairs. Parameters the template does not
/// mention are appended to the query string.
pub fn expand_uri(
    transition: &Transition,
    input: &TransitionInput,
) -> std::result::Result<Url, HyperdriveError> {
    let mut values = parameter_values(transition, input);
    let mut expanded = String::with_capacity(transition.uri.len());
    let mut rest = transition.uri.as_str();

    for expression in template_expressions(&transition.uri) {
        let placeholder = format!("{{{}}}", expression);
        let Some(idx) = rest.find(&placeholder) else {
            break;
        };
        expanded.push_str(&rest[..idx]);
        rest = &rest[idx + placeholder.len()..];

        let (operator, names) = match expression.chars().next() {
            Some(op @ ('?' | '&' | '/' | '+' | '#' | '.' | ';')) => (Some(op), &expression[1..]),
            _ => (None, expression),
        };

        let mut pairs = Vec::new();
        for name in names.split(',') {
            let name = name.split(':').next().unwrap_or("").trim_end_matches('*');
            if let Some(value) = values.remove(name) {
                pairs.push((name.to_string(), value));
            }
        }

        match operator {
            Some('?') | Some('&') => {
                for (i, (name, value)) in pairs.iter().enumerate() {
                    let separator = if i == 0 { operator.unwrap_or('?') } else { '&' };
                    expanded.push(separator);
                    expanded.push_str(&urlencoding::encode(name));
                    expanded.push('=');
                    expanded.push_str(&urlencoding::encode(value));
                }
            }
            Some('/') => {
                for (_, value) in &pairs {
                    expanded.push('/');
                    expanded.push_str(&urlencoding::encode(value));
                }
            }
            Some('+') | Some('#') => {
                if operator == Some('#') && !pairs.is_empty() {
                    expanded.push('#');
                }
                let joined: Vec<&str> = pairs.iter().map(|(_, v)| v.as_str()).collect();
                expanded.push_str(&joined.join(","));
            }
            Some('.') => {
                for (_, value) in &pairs {
                    expanded.push('.');
                    expanded.push_str(&urlencoding::encode(value));
                }
            }
            Some(';') => {
                for (name, value) in &pairs {
                    expanded.push(';');
                    expanded.push_str(&urlencoding::encode(name));
                    if !value.is_empty() {
                        expanded.push('=');
                        expanded.push_str(&urlencoding::encode(value));
                    }
                }
            }
            _ => {
                let joined: Vec<String> = pairs
                    .iter()
                    .map(|(_, v)| urlencoding::encode(v).into_owned())
                    .collect();
                expanded.push_str(&joined.join(","));
            }
        }
    }
    expanded.push_str(rest);

    let mut url =
        Url::parse(&expanded).map_err(|e| HyperdriveError::InvalidUri(format!("{}: {}", expanded, e)))?;

    if !values.is_empty() {
        let mut query = url.query_pairs_mut();
        for (name, value) in &values {
            query.append_pair(name, value);
        }
    }

    Ok(url)
}

/// Build the JSON body for a transition, if its method carries one
pub fn request_body(transition: &Transition, input: &TransitionInput) -> Option<Value> {
    if matches!(transition.method.as_str(), "GET" | "HEAD" | "DELETE") {
        return None;
    }

    let mut body = Map::new();
    for (name, property) in &transition.attributes {
        let value = input
            .attributes
            .get(name)
            .or_else(|| property.effective_value());
        if let Some(value) = value {
            body.insert(name.clone(), value.clone());
        }
    }
    for (name, value) in &input.attributes {
        if !body.contains_key(name) {
            body.insert(name.clone(), value.clone());
        }
    }

    if body.is_empty() && transition.attributes.is_empty() {
        None
    } else {
        Some(Value::Object(body))
    }
}
