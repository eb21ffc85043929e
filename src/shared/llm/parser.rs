use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

lazy_static! {
    /// Regex for trailing commas before } or ]
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();
}

/// Extract a JSON string from model output.
///
/// Tries in order:
/// 1. JSON in markdown code block: ```json ... ```
/// 2. Generic markdown code block: ``` ... ```
/// 3. Plain JSON starting with {
/// 4. JSON embedded anywhere in text (first { to last })
pub fn extract_json_string(text: &str) -> Result<String, String> {
    if text.contains("```json") {
        return text
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| "Failed to extract JSON from markdown code block".to_string());
    }

    if text.contains("```") {
        if let Some(start) = text.find("```") {
            let block_start = start + 3;
            // Skip optional language identifier on the same line
            if let Some(newline_offset) = text[block_start..].find('\n') {
                let json_start = block_start + newline_offset + 1;
                if let Some(end_offset) = text[json_start..].find("```") {
                    return Ok(text[json_start..json_start + end_offset].trim().to_string());
                }
            }
        }
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    let start = text
        .find('{')
        .ok_or_else(|| "No JSON object found in response".to_string())?;
    let end = text
        .rfind('}')
        .ok_or_else(|| "Incomplete JSON object in response".to_string())?;

    if start < end {
        Ok(text[start..=end].to_string())
    } else {
        Err("Invalid JSON boundaries in response".to_string())
    }
}

/// Fix trailing commas in JSON (common model mistake)
///
/// Example: `{"name": "John",}` -> `{"name": "John"}`
pub fn fix_trailing_commas(json_str: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json_str, "$1").to_string()
}

/// Parse model output into a typed value, tolerating markdown fences and
/// trailing commas.
pub fn parse_llm_json<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    let json_str = extract_json_string(text)?;

    match serde_json::from_str(&json_str) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let fixed = fix_trailing_commas(&json_str);
            serde_json::from_str(&fixed)
                .map_err(|_| format!("Failed to parse model JSON: {}", first_err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Annotation {
        title: String,
        labels: Vec<String>,
    }

    #[test]
    fn test_extract_from_json_code_block() {
        let text = "Here you go:\n```json\n{\"title\": \"Beach Day\"}\n```\nDone.";
        assert_eq!(
            extract_json_string(text).unwrap(),
            "{\"title\": \"Beach Day\"}"
        );
    }

    #[test]
    fn test_extract_from_generic_code_block() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_string(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_plain_json() {
        let text = "  {\"a\": 1}  ";
        assert_eq!(extract_json_string(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_embedded_json() {
        let text = "The result is {\"a\": 1} as requested.";
        assert_eq!(extract_json_string(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_no_json() {
        assert!(extract_json_string("no json here").is_err());
    }

    #[test]
    fn test_fix_trailing_commas() {
        assert_eq!(fix_trailing_commas("{\"a\": 1,}"), "{\"a\": 1}");
        assert_eq!(fix_trailing_commas("[1, 2, 3,]"), "[1, 2, 3]");
        assert_eq!(fix_trailing_commas("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_llm_json_typed() {
        let text = "```json\n{\"title\": \"Family Picnic\", \"labels\": [\"family\", \"outdoor\",]}\n```";
        let parsed: Annotation = parse_llm_json(text).unwrap();
        assert_eq!(parsed.title, "Family Picnic");
        assert_eq!(parsed.labels, vec!["family", "outdoor"]);
    }
}
