use regex::Regex;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[A-Za-z]*\s*\n?(.*?)\s*```$").unwrap());

/// Reduce a chat completion to the JSON object it carries.
///
/// Models sometimes wrap the object in a markdown fence or add a sentence
/// before or after it. Returns the trimmed text unchanged when no object
/// delimiters are found so the JSON parser reports the real problem.
pub fn extract_json(content: &str) -> &str {
    let mut text = content.trim();

    if let Some(inner) = CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        text = inner.as_str().trim();
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_untouched() {
        assert_eq!(extract_json(r#"  {"entities": []}  "#), r#"{"entities": []}"#);
    }

    #[test]
    fn test_strips_code_fences() {
        let fenced = "```json\n{\"entities\": [], \"relationships\": []}\n```";
        assert_eq!(extract_json(fenced), r#"{"entities": [], "relationships": []}"#);

        let bare = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(bare), r#"{"a": 1}"#);
    }

    #[test]
    fn test_strips_surrounding_prose() {
        let chatty = "Here is the knowledge graph:\n{\"a\": {\"b\": 1}}\nLet me know if you need more.";
        assert_eq!(extract_json(chatty), r#"{"a": {"b": 1}}"#);
    }

    #[test]
    fn test_no_object_returns_trimmed_text() {
        assert_eq!(extract_json("  sorry, I cannot help  "), "sorry, I cannot help");
    }
}
