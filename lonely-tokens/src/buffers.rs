use crate::{Command, MESSAGE_LENGTH};
use std::fmt;

/// Helper to build an IRC message.
///
/// Use with `Buffer::message` and `ReplyBuffer::reply`.
pub struct MessageBuffer<'a> {
    buf: &'a mut String,
}

impl<'a> MessageBuffer<'a> {
    fn with_prefix<C>(buf: &'a mut String, prefix: &str, command: C) -> Self
        where C: Into<Command>
    {
        if !prefix.is_empty() {
            buf.push(':');
            buf.push_str(prefix);
            buf.push(' ');
        }
        buf.push_str(command.into().as_str());
        MessageBuffer { buf }
    }

    /// Appends a parameter to the message.
    ///
    /// The parameter is trimmed before insertion.  If `param` is whitespace, it is not appended.
    ///
    /// **Note**: It is up to the caller to make sure there is no remaning whitespace or newline in
    /// the parameter.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lonely_tokens::{Command, Buffer};
    /// let mut response = Buffer::new();
    ///
    /// response.message("nick!user@127.0.0.1", Command::Part)
    ///     .param("")
    ///     .param("  #lonely ");
    ///
    /// assert_eq!(&response.build(), ":nick!user@127.0.0.1 PART #lonely\r\n");
    /// ```
    pub fn param(self, param: &str) -> Self {
        let param = param.trim();
        if param.is_empty() {
            return self;
        }
        self.buf.push(' ');
        self.buf.push_str(param);
        self
    }

    /// Formats, then appends a parameter to the message.
    ///
    /// The parameter is **NOT** trimmed before insertion, is appended even if it's empty.  Use it
    /// to echo what the client sent byte for byte.
    ///
    /// **Note**: It is up to the caller to make sure there is no newline in the parameter.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lonely_tokens::{Command, Buffer};
    /// let mut response = Buffer::new();
    ///
    /// response.message("", Command::Pong)
    ///     .fmt_param(":LAG\t42");
    /// response.message("", Command::Pong)
    ///     .fmt_param(42);
    ///
    /// assert_eq!(&response.build(), "PONG :LAG\t42\r\nPONG 42\r\n");
    /// ```
    pub fn fmt_param<T>(self, param: T) -> Self
        where T: fmt::Display
    {
        use std::fmt::Write as _;

        self.buf.push(' ');
        let _ = write!(self.buf, "{}", param);
        self
    }

    /// Appends the traililng parameter to the message and consumes the buffer.
    ///
    /// Contrary to `MessageBuffer::param`, the parameter is not trimmed before insertion.  Even if
    /// `param` is just whitespace, it is appended.
    ///
    /// **Note**: It is up to the caller to make sure there is no newline in the parameter.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lonely_tokens::{Buffer, rpl};
    /// let mut response = Buffer::new();
    ///
    /// response.message("lonely.localdomain", rpl::ENDOFMOTD)
    ///     .param("ryan")
    ///     .trailing_param("End of MOTD command");
    ///
    /// assert_eq!(&response.build(), ":lonely.localdomain 376 ryan :End of MOTD command\r\n");
    /// ```
    pub fn trailing_param(self, param: &str) {
        self.buf.push(' ');
        self.buf.push(':');
        self.buf.push_str(param);
    }

    /// Formats, then appends the trailing parameter to the message and consumes the buffer.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lonely_tokens::{Command, Buffer};
    /// let mut response = Buffer::new();
    ///
    /// response.message("", Command::Error)
    ///     .fmt_trailing_param(format_args!("Closing Link: {}[{}]", "ryan", "localhost"));
    ///
    /// assert_eq!(&response.build(), "ERROR :Closing Link: ryan[localhost]\r\n");
    /// ```
    pub fn fmt_trailing_param<T>(mut self, param: T)
        where T: fmt::Display
    {
        use std::fmt::Write as _;

        let _ = write!(self.raw_trailing_param(), "{}", param);
    }

    /// Returns a buffer the caller can use to append characters to an IRC message.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lonely_tokens::{Buffer, rpl};
    /// let mut response = Buffer::new();
    /// {
    ///     let mut msg = response.message("lonely.localdomain", rpl::NAMREPLY)
    ///         .param("ryan")
    ///         .param("=")
    ///         .param("#lonely");
    ///     let param = msg.raw_trailing_param();
    ///     param.push('@');
    ///     param.push_str("ryan");
    /// }
    ///
    /// assert_eq!(&response.build(), ":lonely.localdomain 353 ryan = #lonely :@ryan\r\n");
    /// ```
    pub fn raw_trailing_param(&mut self) -> &mut String {
        self.buf.push(' ');
        self.buf.push(':');
        self.buf
    }
}

impl Drop for MessageBuffer<'_> {
    /// Auto-magically append "\r\n" when the `MessageBuffer` is dropped.
    fn drop(&mut self) {
        self.buf.push('\r');
        self.buf.push('\n');
    }
}

/// Helper to build IRC messages.
///
/// The `Buffer` is used to ease the creation of strings representing valid IRC messages.  If you
/// mainly need to send numerics, `ReplyBuffer` might be a better fit for you.
///
/// # Example
///
/// ```rust
/// # use lonely_tokens::{Command, Buffer, rpl};
/// let mut response = Buffer::new();
///
/// response.message("nick!user@127.0.0.1", Command::Join)
///     .param("#hall");
/// response.message("lonely.localdomain", rpl::ENDOFNAMES)
///     .param("nick")
///     .param("#hall")
///     .trailing_param("End of NAMES list");
///
/// let result = response.build();
/// assert_eq!(&result, ":nick!user@127.0.0.1 JOIN #hall\r\n\
/// :lonely.localdomain 366 nick #hall :End of NAMES list\r\n");
/// ```
///
/// # On allocation
///
/// Allocation only occurs on `Buffer::message` calls.  These functions reseve `MESSAGE_LENGTH`
/// prior to writing on the internal buffer.
#[derive(Debug, Default)]
pub struct Buffer {
    buf: String,
}

impl Buffer {
    /// Creates a `Buffer`.  Does not allocate.
    pub fn new() -> Self {
        Self {
            buf: String::new(),
        }
    }

    /// Whether the buffer is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lonely_tokens::{Command, Buffer};
    /// let empty = Buffer::new();
    /// let mut not_empty = Buffer::new();
    ///
    /// not_empty.message("", Command::Pong).param("lonely");
    ///
    /// assert_eq!(empty.is_empty(), true);
    /// assert_eq!(not_empty.is_empty(), false);
    /// ```
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Appends an IRC message with a prefix to the buffer.
    ///
    /// If the given `prefix` is empty, no prefix is added.  This function may allocate to reserve
    /// space for the message.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lonely_tokens::{Command, Buffer};
    /// let mut response = Buffer::new();
    ///
    /// response.message("ryan!ryan@localhost", Command::Quit);
    /// response.message("", Command::Pong).param("token");
    ///
    /// assert_eq!(&response.build(), ":ryan!ryan@localhost QUIT\r\nPONG token\r\n");
    /// ```
    pub fn message<C>(&mut self, prefix: &str, command: C) -> MessageBuffer<'_>
        where C: Into<Command>
    {
        self.buf.reserve(MESSAGE_LENGTH);
        MessageBuffer::with_prefix(&mut self.buf, prefix, command)
    }

    /// The messages written so far, `\r\n` included.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consumes the `Buffer` and returns the underlying `String`.
    pub fn build(self) -> String {
        self.buf
    }
}

/// An helper to build numerics meant for the client.
///
/// While `Buffer` is able to build any kind of IRC message, `ReplyBuffer` allows for easy creation
/// of IRC replies: messages that have the server identity as prefix, and the nickname of the
/// client as first parameter.  It writes into a borrowed `Buffer`.
///
/// # Example
///
/// ```rust
/// # use lonely_tokens::{Buffer, Command, ReplyBuffer, rpl};
/// let mut response = Buffer::new();
/// {
///     let mut rb = ReplyBuffer::new(&mut response, "lonely.localdomain", "ryan");
///
///     // Normal message, same API as `Buffer`.
///     rb.message("ryan!ryan@localhost", Command::Part).param("#hall");
///
///     // A reply.  It adds ":lonely.localdomain" and "ryan" automatically.
///     rb.reply(rpl::NOTOPIC)
///         .param("#hall")
///         .trailing_param("No topic is set");
///
///     // A message from the server that is not a reply.
///     rb.prefixed_message(Command::Mode).param("ryan").param("+i");
/// }
///
/// assert_eq!(&response.build(), ":ryan!ryan@localhost PART #hall\r\n\
/// :lonely.localdomain 331 ryan #hall :No topic is set\r\n\
/// :lonely.localdomain MODE ryan +i\r\n");
/// ```
pub struct ReplyBuffer<'a> {
    buf: &'a mut Buffer,
    domain: &'a str,
    nickname: &'a str,
}

impl<'a> ReplyBuffer<'a> {
    /// Creates a new `ReplyBuffer` that writes into `buf`, on behalf of `domain` and for the
    /// client named `nickname`.
    pub fn new(buf: &'a mut Buffer, domain: &'a str, nickname: &'a str) -> Self {
        Self { buf, domain, nickname }
    }

    /// Appends a reply to the buffer.
    ///
    /// This will push the domain, the reply and the nickname of the client, and then return the
    /// resulting `MessageBuffer`.
    pub fn reply<C>(&mut self, r: C) -> MessageBuffer<'_>
        where C: Into<Command>
    {
        let nickname = self.nickname;
        self.prefixed_message(r).param(nickname)
    }

    /// Appends a command to the buffer, with the domain prefix, but without the nickname parameter.
    pub fn prefixed_message<C>(&mut self, command: C) -> MessageBuffer<'_>
        where C: Into<Command>
    {
        let domain = self.domain;
        self.buf.message(domain, command)
    }

    /// Appends a prefixed message like you would do with a `Buffer`.
    pub fn message<C>(&mut self, prefix: &str, command: C) -> MessageBuffer<'_>
        where C: Into<Command>
    {
        self.buf.message(prefix, command)
    }
}
