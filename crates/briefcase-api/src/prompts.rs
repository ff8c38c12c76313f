//! Fixed instructions sent to the model and the helpers that assemble them.

use briefcase_llm::Message;
use briefcase_types::{ChatMessage, DEFAULT_TITLE};

pub const SYSTEM_PROMPT: &str = "You are Briefcase, an AI legal assistant for startup founders. \
Answer questions about company formation, fundraising, equity, contracts, employment and \
intellectual property in plain language. Point out when an issue depends on jurisdiction or \
needs review by a licensed attorney. Be concise and practical, and use markdown when it helps.";

pub const DOCUMENT_CONTEXT_PREFIX: &str = "Context from the uploaded document:\n\n";

pub const FEE_PROMPT: &str = "You estimate how long a startup lawyer would need for a task. \
Given the conversation context and the client's question, reply with a JSON object \
{\"hours\": number, \"rationale\": string}. Hours must be a non-negative number; the rationale \
explains the estimate in two or three sentences.";

pub const TITLE_PROMPT: &str = "Write a short title (at most six words) for a conversation that \
starts with the exchange below. Reply with the title only, without quotes or punctuation at the end.";

pub const SUMMARY_PROMPT: &str = "Summarize the following legal text for a startup founder. \
Keep the key obligations, deadlines, amounts and risks. Use short bullet points.";

pub const PROSPECT_PROMPT: &str = "You find potential customers or partners for a startup law \
practice. From the web page text below, list the companies or organisations worth contacting. \
Reply with a JSON object {\"prospects\": [{\"name\": string, \"website\": string or null, \
\"description\": string}]}. Use an empty list when the page names none.";

/// Longest title kept after cleaning
pub const MAX_TITLE_CHARS: usize = 60;

/// Assemble the chat prompt: system prompt first, then the uploaded document
/// (when there is one), then the transcript in order.
pub fn build_chat_prompt(messages: &[ChatMessage], document_context: Option<&str>) -> Vec<Message> {
    let mut prompt = Vec::with_capacity(messages.len() + 2);
    prompt.push(Message::system(SYSTEM_PROMPT));

    if let Some(context) = document_context.filter(|c| !c.trim().is_empty()) {
        prompt.push(Message::system(format!("{}{}", DOCUMENT_CONTEXT_PREFIX, context)));
    }

    prompt.extend(messages.iter().map(Message::from));
    prompt
}

pub fn title_request(user_message: &str, assistant_message: &str) -> Vec<Message> {
    vec![
        Message::system(TITLE_PROMPT),
        Message::human(format!(
            "User: {}\n\nAssistant: {}",
            user_message, assistant_message
        )),
    ]
}

/// Strip quotes and whitespace the model tends to add, cap the length.
pub fn clean_title(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c.is_whitespace());

    if trimmed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    trimmed.chars().take(MAX_TITLE_CHARS).collect::<String>().trim_end().to_string()
}
