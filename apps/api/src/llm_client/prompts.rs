// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every user-facing generation prompt so replies stay in the
/// locale the clients render.
pub const KOREAN_REPLY_INSTRUCTION: &str =
    "응답은 반드시 한국어로, 마크다운 형식으로 작성해주세요.";

/// Tone line shared by the loan and tarot prompts.
pub const FRIENDLY_EXPERT_TONE: &str =
    "응답은 친근하면서도 전문적인 톤으로 작성하고, 적절한 이모지를 사용해주세요.";

/// Joins prompt sections with a blank line between them, skipping empty ones.
pub fn join_sections(sections: &[&str]) -> String {
    sections
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fills `{name}` placeholders from `values` in a single pass.
///
/// Substituted text is never rescanned, so braces inside values come through
/// verbatim. Placeholders without a value are left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let filled = after.find('}').and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match filled {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
