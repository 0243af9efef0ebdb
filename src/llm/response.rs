//! Pulling structured JSON out of free-form model replies

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{PlaylistError, Result};

/// Strip markdown code fences and surrounding chatter, returning the first
/// balanced JSON object or array in `content`.
pub fn extract_json(content: &str) -> String {
    let content = strip_code_fence(content.trim());

    let start = content.find(|c: char| c == '{' || c == '[');
    let Some(start) = start else {
        return content.to_string();
    };

    let open = content.as_bytes()[start];
    let close = if open == b'{' { b'}' } else { b']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &byte) in content.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b if b == open => depth += 1,
            b if b == close => {
                depth -= 1;
                if depth == 0 {
                    return content[start..=start + offset].to_string();
                }
            }
            _ => {}
        }
    }

    // Unbalanced; hand the tail to serde and let it report the error
    content[start..].to_string()
}

fn strip_code_fence(content: &str) -> &str {
    if !content.starts_with("```") {
        return content;
    }
    let body = match content.find('\n') {
        Some(newline) => &content[newline + 1..],
        None => content.trim_start_matches('`'),
    };
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Parse a model reply into `T`, tolerating fences and leading prose
pub fn parse_json_reply<T: DeserializeOwned>(content: &str) -> Result<T> {
    let json = extract_json(content);
    debug!("Parsing model reply ({} chars of JSON)", json.len());
    serde_json::from_str(&json)
        .map_err(|e| PlaylistError::Llm(format!("model reply was not the expected JSON: {}", e)))
}
