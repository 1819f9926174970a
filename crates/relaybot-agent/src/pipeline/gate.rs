use relaybot_core::ChatMessage;

/// Why an inbound message did not trigger a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    AutomatedSender,
    ForeignChannel,
    CommandPrefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admit,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_admit(self) -> bool {
        matches!(self, Verdict::Admit)
    }
}

/// Decide whether `msg` should run through the pipeline at all.
///
/// Pure: no I/O, no state. Checks run bot → channel → prefix; the first hit wins.
pub fn evaluate(msg: &ChatMessage, target_channel: u64, prefix: char) -> Verdict {
    if msg.author.bot {
        return Verdict::Reject(RejectReason::AutomatedSender);
    }
    if msg.channel_id != target_channel {
        return Verdict::Reject(RejectReason::ForeignChannel);
    }
    if msg.is_command(prefix) {
        return Verdict::Reject(RejectReason::CommandPrefix);
    }
    Verdict::Admit
}
