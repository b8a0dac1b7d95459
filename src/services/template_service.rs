//! Template storage and `{key}` placeholder rendering.
//!
//! Placeholder syntax:
//! - `{name}` is replaced by `data["name"]`. Strings are inserted
//!   verbatim, any other JSON value as its JSON text.
//! - `{{` and `}}` produce literal braces.
//! - An unknown key fails with [`DomainError::MissingTemplateKey`]; an
//!   unclosed `{`, a stray `}` or an empty `{}` fails with
//!   [`DomainError::MalformedTemplate`].

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NewTemplate, Template};
use crate::domain::ports::TemplateRepository;

/// Service for storing templates and rendering them with data.
pub struct TemplateService {
    repo: Arc<dyn TemplateRepository>,
}

impl TemplateService {
    pub fn new(repo: Arc<dyn TemplateRepository>) -> Self {
        Self { repo }
    }

    /// Store a new template.
    ///
    /// The content must already be well-formed so broken templates are
    /// rejected when saved rather than when first rendered.
    #[instrument(skip(self, content), err)]
    pub async fn create_template(&self, name: &str, content: &str) -> DomainResult<Template> {
        if name.trim().is_empty() {
            return Err(DomainError::ValidationFailed("Template name cannot be empty".to_string()));
        }
        placeholders(content)?;

        self.repo.create(&NewTemplate::new(name.trim(), content)).await
    }

    pub async fn load_template(&self, id: i64) -> DomainResult<Option<Template>> {
        self.repo.get(id).await
    }

    pub async fn list_templates(&self) -> DomainResult<Vec<Template>> {
        self.repo.list().await
    }

    #[instrument(skip(self), err)]
    pub async fn delete_template(&self, id: i64) -> DomainResult<()> {
        self.repo.delete(id).await
    }

    /// Render template text with `data`.
    pub fn process_template(&self, content: &str, data: &Map<String, Value>) -> DomainResult<String> {
        render(content, data)
    }

    /// Load a stored template and render it.
    #[instrument(skip(self, data), err)]
    pub async fn render(&self, template_id: i64, data: &Map<String, Value>) -> DomainResult<String> {
        let template = self
            .repo
            .get(template_id)
            .await?
            .ok_or(DomainError::TemplateNotFound(template_id))?;

        let rendered = render(&template.content, data)?;
        debug!(template = %template.name, len = rendered.len(), "template rendered");
        Ok(rendered)
    }
}

/// A lexed piece of template text.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

/// Split template text into literal and placeholder segments.
fn lex(content: &str) -> DomainResult<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let bytes = content.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                segments.push(Segment::Literal(&content[literal_start..i]));
                segments.push(Segment::Brace('{'));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                segments.push(Segment::Literal(&content[literal_start..i]));
                let rest = &content[i + 1..];
                let close = rest.find(['{', '}']).filter(|&pos| rest.as_bytes()[pos] == b'}').ok_or_else(|| {
                    DomainError::MalformedTemplate(format!("unclosed '{{' at byte {i}"))
                })?;
                let key = &rest[..close];
                if key.is_empty() {
                    return Err(DomainError::MalformedTemplate(format!(
                        "empty placeholder at byte {i}"
                    )));
                }
                segments.push(Segment::Placeholder(key));
                i += close + 2;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                segments.push(Segment::Literal(&content[literal_start..i]));
                segments.push(Segment::Brace('}'));
                i += 2;
                literal_start = i;
            }
            b'}' => {
                return Err(DomainError::MalformedTemplate(format!("single '}}' at byte {i}")));
            }
            _ => i += 1,
        }
    }
    segments.push(Segment::Literal(&content[literal_start..]));

    Ok(segments)
}

/// Placeholder keys used by a template, in order of appearance.
pub fn placeholders(content: &str) -> DomainResult<Vec<&str>> {
    Ok(lex(content)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(key) => Some(key),
            _ => None,
        })
        .collect())
}

/// Render template text with `data`.
pub fn render(content: &str, data: &Map<String, Value>) -> DomainResult<String> {
    let mut out = String::with_capacity(content.len());
    for segment in lex(content)? {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Brace(c) => out.push(c),
            Segment::Placeholder(key) => match data.get(key) {
                Some(Value::String(s)) => out.push_str(s),
                Some(other) => out.push_str(&other.to_string()),
                None => return Err(DomainError::MissingTemplateKey(key.to_string())),
            },
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test data must be an object"),
        }
    }

    #[test]
    fn test_render_replaces_placeholders() {
        let rendered = render("Sample {key} content", &data(json!({"key": "value"}))).unwrap();
        assert_eq!(rendered, "Sample value content");
    }

    #[test]
    fn test_render_non_string_values() {
        let rendered = render(
            "{book} {chapter}:{verse} {flag}",
            &data(json!({"book": "John", "chapter": 3, "verse": 16, "flag": null})),
        )
        .unwrap();
        assert_eq!(rendered, "John 3:16 null");
    }

    #[test]
    fn test_render_escaped_braces() {
        let rendered = render("{{literal}} {x}", &data(json!({"x": "y"}))).unwrap();
        assert_eq!(rendered, "{literal} y");
    }

    #[test]
    fn test_render_missing_key() {
        let err = render("Hello {name}", &Map::new()).unwrap_err();
        match err {
            DomainError::MissingTemplateKey(key) => assert_eq!(key, "name"),
            other => panic!("expected MissingTemplateKey, got {other:?}"),
        }
    }

    #[test]
    fn test_render_malformed_templates() {
        for content in ["Hello {name", "Hello name}", "{}", "{a{b}}"] {
            let err = render(content, &data(json!({"name": "x", "a": "x"}))).unwrap_err();
            assert!(
                matches!(err, DomainError::MalformedTemplate(_)),
                "{content:?} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn test_render_empty_and_unicode() {
        assert_eq!(render("", &Map::new()).unwrap(), "");
        let rendered = render("{책} 1장", &data(json!({"책": "창세기"}))).unwrap();
        assert_eq!(rendered, "창세기 1장");
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(placeholders("{a} {{b}} {c}").unwrap(), vec!["a", "c"]);
    }
}
