use tracing::{debug, error, info, warn};

use relaybot_core::ChatMessage;

use crate::provider::ProviderError;
use crate::runtime::RelayRuntime;

use super::conversation::build_conversation;
use super::gate::{evaluate, RejectReason, Verdict};
use super::transport::{ChannelTransport, TransportError};

/// How a single inbound message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The gate turned it away before any I/O.
    Rejected(RejectReason),
    /// The provider answered without a usable candidate; nothing was posted.
    NoCandidate,
    /// A reply was posted.
    Replied,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetching history: {0}")]
    History(#[source] TransportError),

    #[error("requesting completion: {0}")]
    Completion(#[from] ProviderError),

    #[error("posting reply: {0}")]
    Reply(#[source] TransportError),
}

/// Run the relay for one inbound message and report what happened.
///
/// Aborts at the first failing stage. A typing-indicator failure is logged
/// and does not abort.
pub async fn process_message<T: ChannelTransport + ?Sized>(
    runtime: &RelayRuntime,
    transport: &T,
    msg: &ChatMessage,
    bot_id: u64,
) -> Result<RelayOutcome, PipelineError> {
    let settings = runtime.settings();

    if let Verdict::Reject(reason) = evaluate(msg, runtime.target_channel(), settings.command_prefix)
    {
        debug!(message_id = msg.id, ?reason, "message rejected by gate");
        return Ok(RelayOutcome::Rejected(reason));
    }

    if let Err(e) = transport.start_typing(msg.channel_id).await {
        warn!(error = %e, channel_id = msg.channel_id, "typing indicator failed");
    }

    let batch = transport
        .fetch_recent(msg.channel_id, settings.history_limit)
        .await
        .map_err(PipelineError::History)?;

    let log = build_conversation(&settings.persona, &batch, bot_id, settings.command_prefix);
    debug!(
        message_id = msg.id,
        fetched = batch.len(),
        kept = log.len() - 1,
        "conversation built"
    );

    let Some(result) = runtime.complete(log).await? else {
        info!(message_id = msg.id, "provider returned no candidates, not replying");
        return Ok(RelayOutcome::NoCandidate);
    };

    transport
        .reply(msg, &result.content)
        .await
        .map_err(PipelineError::Reply)?;

    Ok(RelayOutcome::Replied)
}

/// Per-message error boundary.
///
/// Failures are logged and swallowed: the sender simply gets no reply.
/// Returns `None` when the pipeline failed.
pub async fn handle_message<T: ChannelTransport + ?Sized>(
    runtime: &RelayRuntime,
    transport: &T,
    msg: &ChatMessage,
    bot_id: u64,
) -> Option<RelayOutcome> {
    match process_message(runtime, transport, msg, bot_id).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            error!(
                error = %e,
                channel_id = msg.channel_id,
                message_id = msg.id,
                "relay failed, message dropped"
            );
            None
        }
    }
}
