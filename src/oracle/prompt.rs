//! Prompt construction

use super::DurationBudget;

/// Hard cap on how much document text is shown to the oracle.
///
/// Sentences beyond this many characters can never be selected.
pub const MAX_INPUT_CHARS: usize = 8000;

/// Truncate to at most `max_chars` characters (UTF-8 safe)
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Build the instruction asking the oracle for sentences readable within `budget`
pub fn build_prompt(text: &str, budget: DurationBudget) -> String {
    let excerpt = truncate_chars(text, MAX_INPUT_CHARS);
    format!(
        "From the following text, select the most important sentences that together\n\
         can be read in about {minutes} minutes (~{tokens} tokens).\n\
         Copy each sentence exactly as it appears in the text.\n\
         Return JSON: [{{\"sentence\": \"...\"}}, ...]\n\
         Text: {excerpt}",
        minutes = budget.minutes(),
        tokens = budget.token_budget(),
        excerpt = excerpt,
    )
}
