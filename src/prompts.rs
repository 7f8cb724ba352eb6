use crate::config::Detail;

/// Builds the intro prompt for a review run: reviewer persona, the comment
/// format instructions, the requested detail level, any additional context
/// and finally the diff itself.
pub fn intro_prompt(diff: &str, context: &str, detail: Detail) -> String {
    [
        "You are a helpful senior software engineer.".to_string(),
        "Review the following git diff and give actionable feedback, \
         highlighting bugs, code smells, security issues and best-practice violations."
            .to_string(),
        "For each review comment provide:".to_string(),
        "- An **Issue** with an explanation.".to_string(),
        "- An **Action** with code suggestions.".to_string(),
        format!("Please use a {detail} level of detail."),
        "Try not to nitpick.".to_string(),
        context.to_string(),
        String::new(),
        format!("Diff:\n{diff}"),
    ]
    .join("\n")
}
