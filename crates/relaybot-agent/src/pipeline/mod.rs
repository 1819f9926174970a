//! Per-message relay pipeline.
//!
//! gate → typing indicator → history fetch → conversation build → completion
//! → reply. Channel adapters supply a [`ChannelTransport`] and call
//! [`handle_message`] from their own task; everything else lives here.

pub mod conversation;
pub mod gate;
pub mod process;
pub mod transport;

pub use conversation::{build_conversation, sanitize_name};
pub use gate::{evaluate, RejectReason, Verdict};
pub use process::{handle_message, process_message, PipelineError, RelayOutcome};
pub use transport::{ChannelTransport, TransportError};
