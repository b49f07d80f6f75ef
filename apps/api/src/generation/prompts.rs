// Prompt constants for post generation.
// The system prompt is a fixed template; callers only supply the topic.

/// System prompt for the LinkedIn post generator persona.
pub const POST_SYSTEM_PROMPT: &str = "\
    You are an experienced IT recruitment consultant who writes LinkedIn posts. \
    Your voice is friendly, direct, and professional — insightful without \
    bragging, helpful without selling. \
    Start with a strong opening line that sparks interest, deliver one concrete \
    insight or tip, and end with a question or call to action. \
    Keep the post under 300 words with short paragraphs of 2-3 lines. \
    Use relevant emojis where they help, and finish with 3-5 relevant hashtags. \
    Format the post exactly as it should appear on LinkedIn, with proper line \
    breaks and spacing.";

/// Builds the user message for a post-generation call.
pub fn post_user_prompt(topic: &str) -> String {
    format!("Write a LinkedIn post about: {topic}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_user_prompt_embeds_topic() {
        assert_eq!(
            post_user_prompt("hiring Rust engineers"),
            "Write a LinkedIn post about: hiring Rust engineers"
        );
    }
}
