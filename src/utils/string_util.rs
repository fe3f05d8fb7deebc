use std::borrow::Cow;

pub trait StripCodeBlock {
    /// Removes every ``` fence marker (and the language tag right after an
    /// opening fence), keeping the fenced content.
    fn strip_code_block(&self) -> Cow<'_, str>;
}

impl StripCodeBlock for str {
    fn strip_code_block(&self) -> Cow<'_, str> {
        if !self.contains("```") {
            return Cow::Borrowed(self);
        }

        let mut out = String::with_capacity(self.len());
        let mut rest = self;
        while let Some(pos) = rest.find("```") {
            out.push_str(&rest[..pos]);
            rest = &rest[pos + 3..];
            let tag_len = rest
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(rest.len());
            rest = &rest[tag_len..];
        }
        out.push_str(rest);
        Cow::Owned(out)
    }
}

/// Splits a comma-joined list into trimmed, non-empty tokens.
pub fn parse_to_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Joins tokens the way the prompts present lists.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n[{\"a\": 1}]\n```";
        assert_eq!(raw.strip_code_block().trim(), "[{\"a\": 1}]");
    }

    #[test]
    fn strips_fence_in_the_middle_of_chatter() {
        let raw = "결과입니다:\n```\n{\"k\": 2}\n```\n감사합니다";
        let stripped = raw.strip_code_block();
        assert!(!stripped.contains("```"));
        assert!(stripped.contains("{\"k\": 2}"));
        assert!(stripped.starts_with("결과입니다:"));
    }

    #[test]
    fn leaves_plain_text_borrowed() {
        assert!(matches!("[1, 2]".strip_code_block(), Cow::Borrowed(_)));
    }

    #[test]
    fn parse_to_list_drops_empty_tokens() {
        assert_eq!(
            parse_to_list(" 안전모, ,안전화 ,, 각반"),
            vec!["안전모", "안전화", "각반"]
        );
        assert!(parse_to_list("").is_empty());
        assert!(parse_to_list(" , ").is_empty());
    }
}
