//! Turns a raw history window into the role-tagged log sent to the provider.

use relaybot_core::ChatMessage;

use crate::provider::{ConversationEntry, Role};

/// The completions API caps `name` at 64 characters.
const MAX_NAME_LEN: usize = 64;

/// Build the conversation log for one completion request.
///
/// `batch` is newest-first, as the platform returns it. The result starts with
/// exactly one system entry carrying `persona`, followed by the kept messages
/// oldest-first. Dropped: anything starting with `prefix`, and anything from an
/// automated account other than `bot_id`.
pub fn build_conversation(
    persona: &str,
    batch: &[ChatMessage],
    bot_id: u64,
    prefix: char,
) -> Vec<ConversationEntry> {
    let mut log = Vec::with_capacity(batch.len() + 1);
    log.push(ConversationEntry::system(persona));
    log.extend(
        batch
            .iter()
            .rev()
            .filter(|msg| keep(msg, bot_id, prefix))
            .map(|msg| to_entry(msg, bot_id)),
    );
    log
}

fn keep(msg: &ChatMessage, bot_id: u64, prefix: char) -> bool {
    if msg.is_command(prefix) {
        return false;
    }
    !(msg.author.bot && !msg.is_from(bot_id))
}

fn to_entry(msg: &ChatMessage, bot_id: u64) -> ConversationEntry {
    let role = if msg.is_from(bot_id) {
        Role::Assistant
    } else {
        Role::User
    };
    let name = sanitize_name(&msg.author.name);
    ConversationEntry {
        role,
        content: msg.content.clone(),
        name: (!name.is_empty()).then_some(name),
    }
}

/// Make a display name acceptable as a completions `name` field.
///
/// Two steps: every whitespace run becomes one `_`, then everything outside
/// `[A-Za-z0-9_]` is dropped. Idempotent.
pub fn sanitize_name(raw: &str) -> String {
    let mut collapsed = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push('_');
            }
            in_space = true;
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }

    collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(MAX_NAME_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaybot_core::Author;

    const BOT: u64 = 900;
    const PERSONA: &str = "You are a friendly chatbot.";

    fn msg(id: u64, author_id: u64, name: &str, bot: bool, content: &str) -> ChatMessage {
        ChatMessage {
            id,
            channel_id: 1,
            author: Author {
                id: author_id,
                name: name.to_string(),
                bot,
            },
            content: content.to_string(),
            timestamp: Default::default(),
        }
    }

    #[test]
    fn sanitize_collapses_whitespace_and_strips_punctuation() {
        assert_eq!(sanitize_name("John Doe!"), "John_Doe");
        assert_eq!(sanitize_name("a  \t b"), "a_b");
        assert_eq!(sanitize_name("x.y-z"), "xyz");
        assert_eq!(sanitize_name("already_ok_123"), "already_ok_123");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["John Doe!", "  lead", "tab\there", "émile zola", "", "!!!", "a - b"] {
            let once = sanitize_name(raw);
            assert_eq!(sanitize_name(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn sanitize_drops_non_ascii_letters() {
        assert_eq!(sanitize_name("émile zola"), "mile_zola");
    }

    #[test]
    fn sanitize_caps_length() {
        let long = "a".repeat(200);
        assert_eq!(sanitize_name(&long).len(), MAX_NAME_LEN);
    }

    #[test]
    fn empty_batch_yields_system_entry_only() {
        let log = build_conversation(PERSONA, &[], BOT, '!');
        assert_eq!(log, vec![ConversationEntry::system(PERSONA)]);
    }

    #[test]
    fn output_is_chronological() {
        // Newest first, as fetched.
        let batch = vec![
            msg(3, 1, "alice", false, "third"),
            msg(2, 2, "bob", false, "second"),
            msg(1, 1, "alice", false, "first"),
        ];
        let log = build_conversation(PERSONA, &batch, BOT, '!');

        assert_eq!(log[0].role, Role::System);
        let contents: Vec<&str> = log[1..].iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert_eq!(log.iter().filter(|e| e.role == Role::System).count(), 1);
    }

    #[test]
    fn mixed_batch_keeps_own_replies_and_drops_foreign_bot_command() {
        let batch = vec![
            msg(3, 555, "OtherBot", true, "!ping"),
            msg(2, 7, "John Doe!", false, "hello"),
            msg(1, BOT, "relay bot", true, "Hi, how can I help?"),
        ];
        let log = build_conversation(PERSONA, &batch, BOT, '!');

        assert_eq!(log.len(), 3);
        assert_eq!(log[1].role, Role::Assistant);
        assert_eq!(log[1].content, "Hi, how can I help?");
        assert_eq!(
            log[2],
            ConversationEntry {
                role: Role::User,
                content: "hello".to_string(),
                name: Some("John_Doe".to_string()),
            }
        );
    }

    #[test]
    fn foreign_bot_dropped_regardless_of_content() {
        let batch = vec![msg(1, 555, "OtherBot", true, "perfectly normal text")];
        let log = build_conversation(PERSONA, &batch, BOT, '!');
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn own_commands_are_dropped_too() {
        let batch = vec![msg(1, BOT, "relay", true, "!internal")];
        let log = build_conversation(PERSONA, &batch, BOT, '!');
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn content_is_forwarded_verbatim() {
        let raw = "  spaced *markdown* <@123>  ";
        let batch = vec![msg(1, 7, "alice", false, raw)];
        let log = build_conversation(PERSONA, &batch, BOT, '!');
        assert_eq!(log[1].content, raw);
    }

    #[test]
    fn unsanitizable_name_is_omitted() {
        let batch = vec![msg(1, 7, "!!!", false, "hi")];
        let log = build_conversation(PERSONA, &batch, BOT, '!');
        assert_eq!(log[1].name, None);
    }

    #[test]
    fn log_length_bounded_by_window() {
        let batch: Vec<_> = (0..15)
            .map(|i| msg(i, 7, "alice", false, "msg"))
            .collect();
        let log = build_conversation(PERSONA, &batch, BOT, '!');
        assert_eq!(log.len(), 16);
    }
}
