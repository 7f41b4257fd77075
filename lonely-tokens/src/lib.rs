//! Split and build IRC lines.
//!
//! This library provides the two halves of the lonely-ircd wire format: `Message::parse` turns a
//! decoded line into a verb and its arguments, and `Buffer`/`ReplyBuffer` build the replies,
//! `\r\n` included.

#![forbid(unsafe_code)]
#![warn(clippy::all, rust_2018_idioms)]
#![allow(clippy::shadow_unrelated, clippy::use_self)]

pub use buffers::{Buffer, MessageBuffer, ReplyBuffer};
pub use command::Command;
pub use message::{Message, MESSAGE_LENGTH};

mod buffers;
mod command;
mod message;
pub mod rpl;

/// The leading character of channel names.
pub const CHANNEL_SIGIL: char = '#';

/// Whether the given target names a channel rather than a user.
///
/// # Example
///
/// ```rust
/// # use lonely_tokens::is_channel;
/// assert!(is_channel("#lonely"));
/// assert!(!is_channel("ryan"));
/// assert!(!is_channel(""));
/// ```
pub fn is_channel(target: &str) -> bool {
    target.starts_with(CHANNEL_SIGIL)
}
