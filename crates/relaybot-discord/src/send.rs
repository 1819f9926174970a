use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::id::{ChannelId, MessageId};

/// Maximum characters per Discord message (2000 is the limit; we use 1950 for safety).
const CHUNK_MAX: usize = 1950;

/// Split `text` into chunks of at most [`CHUNK_MAX`] bytes, preferring
/// splits on newline, then space, and never inside a UTF-8 sequence.
/// The separator a split lands on is dropped; nothing else is trimmed.
pub fn split_chunks(text: &str) -> Vec<String> {
    if text.len() <= CHUNK_MAX {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while remaining.len() > CHUNK_MAX {
        let mut limit = CHUNK_MAX;
        while !remaining.is_char_boundary(limit) {
            limit -= 1;
        }

        let window = &remaining[..limit];
        let separator = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&i| i > 0);

        // Drop only the separator itself; whatever follows it is kept verbatim.
        let (split_at, resume_at) = match separator {
            Some(i) => (i, i + 1),
            None => (limit, limit),
        };

        chunks.push(remaining[..split_at].to_string());
        remaining = &remaining[resume_at..];
    }

    if !remaining.is_empty() {
        chunks.push(remaining.to_string());
    }

    chunks
}

/// Post `text` as a reply to `reply_to`.
///
/// Only the first chunk carries the message reference; the rest follow as
/// plain channel messages.
pub async fn send_reply(
    http: &Http,
    channel_id: ChannelId,
    reply_to: MessageId,
    text: &str,
) -> Result<(), serenity::Error> {
    for (i, chunk) in split_chunks(text).into_iter().enumerate() {
        let mut builder = CreateMessage::new().content(chunk);
        if i == 0 {
            builder = builder.reference_message((channel_id, reply_to));
        }
        channel_id.send_message(http, builder).await?;
    }
    Ok(())
}
