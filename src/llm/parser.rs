use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub fn parse_llm_response<T: DeserializeOwned>(response: &str) -> Result<T> {
    if let Ok(parsed) = serde_json::from_str(response.trim()) {
        return Ok(parsed);
    }

    let json_str = extract_json(response)?;

    serde_json::from_str(&json_str)
        .map_err(|e| Error::ParseError(format!("Failed to parse LLM response: {}", e)))
}

fn extract_json(text: &str) -> Result<String> {
    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            return Ok(text[start..start + end].trim().to_string());
        }
    }

    if let Some(start) = text.find("```") {
        let start = start + 3;
        // Skip any language identifier on the same line
        let start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[start..].find("```") {
            let content = text[start..start + end].trim();
            if content.starts_with('{') {
                return Ok(content.to_string());
            }
        }
    }

    if let Some(start) = text.find('{') {
        let mut depth = 0;
        let mut end = start;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, c) in text[start..].char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }

        if depth == 0 && end > start {
            return Ok(text[start..end].to_string());
        }
    }

    Err(Error::ParseError("No valid JSON found in response".to_string()))
}
