//! Chat relay: validates simplified chat requests and forwards them to the
//! upstream Messages API with a server-held credential

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod handler;
pub mod state;
pub mod types;
pub mod upstream;

pub use error::ChatError;
pub use handler::{chat_router, debug_echo};
pub use state::ChatState;
pub use types::{InboundChatRequest, OutboundChatRequest, OutboundPolicy};
pub use upstream::{AnthropicUpstream, Upstream, UpstreamReply};
