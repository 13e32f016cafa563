use once_cell::sync::Lazy;
use regex::Regex;

static REASONING_BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(think|reasoning)>[\s\S]*?</(think|reasoning)>|<think\s*/>").unwrap()
});

static WRAPPING_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[a-zA-Z]*\n([\s\S]*?)\n```$").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalizes narrative text returned by the model before it is shown.
pub fn clean_narrative(response: &str) -> String {
    let without_reasoning = REASONING_BLOCK_PATTERN.replace_all(response, "");
    let trimmed = without_reasoning.trim();

    let unfenced = match WRAPPING_FENCE_PATTERN.captures(trimmed) {
        Some(captures) => captures[1].trim().to_string(),
        None => trimmed.to_string(),
    };

    MULTIPLE_NEWLINES_PATTERN
        .replace_all(&unfenced, "\n\n")
        .to_string()
}

/// Splits narrative text into paragraphs on blank lines.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
