//! Connection state and API to handle incoming commands.
//!
//! This module is split in several files:
//!
//! - `mod.rs`: public API of the connection state, command dispatch
//! - `rfc2812.rs` : handlers for the supported messages defined in the RFC 2812
//!
//! Every connection gets its own `State`.  Nothing here is shared between connections, except the
//! read-only `Settings`: the client never sees anyone but itself.

use crate::config;
use crate::session::Session;
use crate::util::time_str;
use lonely_tokens::{Buffer, Command, Message};
use std::{fmt, net};
use std::sync::Arc;

mod rfc2812;

/// The version string sent in RPL_YOURHOST and RPL_MYINFO.
const SERVER_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));

pub type Result<T> = std::result::Result<T, Error>;

/// A command the connection cannot recover from.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The command has fewer arguments than its handler reads.
    NeedMoreParams {
        command: Command,
        required: usize,
        given: usize,
    },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeedMoreParams { command, required, given } => write!(
                f,
                "{} needs {} parameter(s), {} given",
                command, required, given
            ),
        }
    }
}

/// What the connection should do after a message has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Write the replies, then read the next message.
    Continue,

    /// Write the replies, then close the connection.
    Close,
}

/// Read-only data every connection needs.
#[derive(Debug)]
pub struct Settings {
    /// The formatted time when the server started.  It is sent to the client when they register
    /// (in a "003 RPL_CREATED" reply).
    pub(crate) created_at: String,

    /// The message of the day.
    pub(crate) motd: String,

    /// Maximum length of incoming lines, in bytes.
    pub(crate) max_line_length: usize,
}

impl Settings {
    pub fn new(config: config::State) -> Self {
        Self {
            created_at: time_str(),
            motd: config.motd,
            max_line_length: config.max_line_length,
        }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }
}

/// The state of one IRC connection.
///
/// It consumes the messages sent by the client one at a time with `State::handle_message`, and
/// writes the replies into a `Buffer` the caller then sends back.  It does no I/O by itself.
///
/// # Example
///
/// ```ignore
/// let mut state = State::new(peer_addr, settings);
/// let mut replies = Buffer::new();
///
/// let msg = Message::parse("PING lonely").unwrap();
/// assert_eq!(state.handle_message(&mut replies, msg), Ok(Flow::Continue));
/// assert_eq!(replies.as_str(), "PONG lonely\r\n");
/// ```
pub struct State {
    /// The address of the client, for logging.
    addr: net::SocketAddr,

    session: Session,

    settings: Arc<Settings>,
}

impl State {
    pub fn new(addr: net::SocketAddr, settings: Arc<Settings>) -> Self {
        Self {
            addr,
            session: Session::new(),
            settings,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Updates the state according to the given message, and appends the replies to `out`.
    ///
    /// Unknown commands, and commands sent before registration other than "NICK", "USER",
    /// "PING" and "QUIT", are dropped without a reply.  A command with missing arguments is an
    /// error, and the connection should be closed.
    pub fn handle_message(&mut self, out: &mut Buffer, msg: Message<'_>) -> Result<Flow> {
        let command = match msg.command {
            Ok(cmd) => cmd,
            Err(unknown) => {
                log::debug!("{}: unknown command {:?}, dropped", self.addr, unknown);
                return Ok(Flow::Continue);
            }
        };

        if !self.session.can_issue_command(command) {
            log::debug!("{}: {} before registration, dropped", self.addr, command);
            return Ok(Flow::Continue);
        }

        if !msg.has_enough_params() {
            return Err(Error::NeedMoreParams {
                command,
                required: command.required_params(),
                given: msg.params.len(),
            });
        }

        let ps = &msg.params;
        log::debug!("{}: {} {:?}", self.addr, command, ps);
        match command {
            Command::Join => self.cmd_join(out, ps[0]),
            Command::Mode => self.cmd_mode(out, ps[0], ps.get(1).copied()),
            Command::Names => self.cmd_names(out, ps[0]),
            Command::Nick => self.cmd_nick(out, ps[0]),
            Command::Part => self.cmd_part(out, ps[0]),
            Command::Ping => self.cmd_ping(out, ps[0]),
            Command::Quit => {
                self.cmd_quit(out);
                return Ok(Flow::Close);
            }
            Command::Topic => self.cmd_topic(out, ps[0]),
            Command::User => self.cmd_user(out, ps[0], ps[1], ps[2], &ps[3..]),
            Command::Who => self.cmd_who(out, ps[0]),
            Command::Error | Command::Pong | Command::Reply(_) => {}
        }

        Ok(Flow::Continue)
    }
}
