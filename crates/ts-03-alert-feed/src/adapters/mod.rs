//! Event source adapters

pub mod channel;
pub mod json_rpc;

pub use channel::{event_channel, ChainEventSender, ChannelEventSource};
pub use json_rpc::{JsonRpcLogSource, LogPollConfig};
