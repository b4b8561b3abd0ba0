//! Prompt templates for LLM-generated documentation comments.

use super::LlmTarget;

/// Maximum line length requested from the model.
pub const MAX_LINE_LENGTH: usize = 100;

/// Builds the system and user messages for a generation request.
pub struct PromptBuilder;

impl PromptBuilder {
    /// System message scoped to the kind of declaration.
    pub fn system_prompt(target: LlmTarget) -> String {
        let mut prompt = format!(
            "Based on the source code provided, give me a XML comment of a C# {kind}. \
             Limit the max length of a line to {MAX_LINE_LENGTH} chars.",
            kind = target.noun(),
        );

        match target {
            LlmTarget::Class => prompt.push_str(" Use the same indentation."),
            LlmTarget::Method => {
                prompt.push_str(" Add links to object types. Never use <seealso> elements.")
            }
        }

        prompt.push_str(
            "\n\nIMPORTANT: Reply with ONLY the comment lines, each starting with ///. \
             Do NOT repeat the source code and do NOT wrap the comment in markdown code blocks.",
        );
        prompt
    }

    /// User message carrying the declaration's source text.
    pub fn user_prompt(target: LlmTarget, source_text: &str) -> String {
        format!(
            "Here is the source code of the {kind}:\n{source_text}",
            kind = target.noun()
        )
    }
}
