//! JSON payload extraction
//!
//! LLM completions that are asked for "only JSON" still arrive wrapped in
//! Markdown fences or with stray prose around the object. This pulls a
//! single JSON value out of free text.

use serde_json::Value;

/// Extract one JSON value from a free-text completion.
///
/// Strips ```` ```json ````/```` ``` ```` fences and trims, then parses the
/// remainder. If that fails, falls back to the outermost `{...}` span.
/// Returns `None` when no parseable JSON is present.
pub fn extract_json_payload(text: &str) -> Option<Value> {
    let stripped = strip_fences(text);

    if let Ok(value) = serde_json::from_str(stripped.trim()) {
        return Some(value);
    }

    // Stray prose around the object; try the outermost brace span
    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&stripped[start..=end]).ok()
}

fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_json() {
        let value = extract_json_payload(r#"{"name": "update_product_price"}"#).unwrap();
        assert_eq!(value["name"], "update_product_price");
    }

    #[test]
    fn test_fenced_json() {
        let text = "```json\n{\"name\": \"sales_report_for_date\", \"arguments\": {\"date\": \"2024-03-15\"}}\n```";
        let value = extract_json_payload(text).unwrap();
        assert_eq!(value["arguments"]["date"], "2024-03-15");
    }

    #[test]
    fn test_prose_wrapped_json() {
        let text = "Here is the result you asked for: {\"name\": null, \"content\": \"no match\"} Hope that helps!";
        let value = extract_json_payload(text).unwrap();
        assert_eq!(value["name"], json!(null));
    }

    #[test]
    fn test_unparseable_text() {
        assert!(extract_json_payload("I could not understand the request.").is_none());
        assert!(extract_json_payload("{ broken").is_none());
    }

    #[test]
    fn test_nested_braces() {
        let text = "```\n{\"a\": {\"b\": 1}}\n```";
        let value = extract_json_payload(text).unwrap();
        assert_eq!(value["a"]["b"], 1);
    }
}
