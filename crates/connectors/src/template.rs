//! Endpoint template resolution
//!
//! Templates look like `orders/{order_id}/products`. Every placeholder is
//! filled from the query map and percent-encoded so a value can never add
//! path segments or start a query string.

use crate::error::ConnectorError;
use crate::filter::QueryMap;

enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Split a template into literal text and placeholders
///
/// Braces that do not enclose a valid identifier are kept as literal text.
fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_identifier(&after[..close]) => {
                if open > 0 {
                    out.push(Segment::Literal(&rest[..open]));
                }
                out.push(Segment::Param(&after[..close]));
                rest = &after[close + 1..];
            }
            _ => {
                out.push(Segment::Literal(&rest[..=open]));
                rest = after;
            }
        }
    }

    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }
    out
}

/// Placeholder names in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    segments(template)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Param(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Substitute every `{placeholder}` from the query map
///
/// # Errors
///
/// Returns `MissingPathParameter` naming the first placeholder whose value
/// is absent or blank.
pub fn resolve_template(template: &str, query: &QueryMap) -> Result<String, ConnectorError> {
    let mut resolved = String::with_capacity(template.len());

    for segment in segments(template) {
        match segment {
            Segment::Literal(text) => resolved.push_str(text),
            Segment::Param(name) => {
                let value = query.get_non_blank(name).ok_or_else(|| {
                    ConnectorError::MissingPathParameter {
                        template: template.to_string(),
                        parameter: name.to_string(),
                    }
                })?;
                resolved.push_str(&urlencoding::encode(value));
            }
        }
    }

    Ok(resolved)
}
