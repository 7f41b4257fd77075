use crate::Command;

/// The recommended length of a message.
///
/// `Message::parse` can parse messages longer than that.  It is used by `Buffer` to avoid multiple
/// allocations when building the same message.
pub const MESSAGE_LENGTH: usize = 512;

/// An IRC message, as sent by a client.
///
/// See `Message::parse` for documentation on how lines are split, and `Buffer` for how to create
/// messages.
#[derive(Clone, Debug, PartialEq)]
pub struct Message<'a> {
    /// The command of the message.
    ///
    /// It can either be a valid command in the form of `Ok(Command::_)`, or a simple string.
    /// `Message::parse` sets this field to `Err(_)` if the verb is not a variant of `Command`.
    pub command: Result<Command, &'a str>,

    /// The arguments of the message, in order.
    pub params: Vec<&'a str>,
}

impl<'a> Message<'a> {
    /// Splits a line into a verb and its arguments.
    ///
    /// Words are separated by single spaces.  There is no prefix, tag or trailing parameter
    /// handling: a leading `:` stays part of its word, and the words of a multi-word trailing
    /// parameter are separate arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lonely_tokens::{Command, Message};
    /// let user = Message::parse("USER ryan 0 * :Ryan Finnie").unwrap();
    ///
    /// assert_eq!(user.command, Ok(Command::User));
    /// assert_eq!(user.params, vec!["ryan", "0", "*", ":Ryan", "Finnie"]);
    /// ```
    ///
    /// If the command is unknown, it is stored as `Err(command_string)`, where `command_string` is
    /// taken from the input string:
    ///
    /// ```rust
    /// # use lonely_tokens::{Command, Message};
    /// let unknown = Message::parse("PRIVMSG #lonely :hello?").unwrap();
    ///
    /// assert_eq!(unknown.command, Err("PRIVMSG"));
    /// assert_eq!(unknown.params, vec!["#lonely", ":hello?"]);
    /// ```
    ///
    /// # Return value
    ///
    /// Returns `None` when the line is empty, `Some(msg)` otherwise.
    ///
    /// ```rust
    /// # use lonely_tokens::Message;
    /// assert!(Message::parse("").is_none());
    /// ```
    pub fn parse(s: &'a str) -> Option<Message<'a>> {
        if s.is_empty() {
            return None;
        }

        let mut words = s.split(' ');
        let verb = words.next().unwrap_or("");
        let command = Command::parse(verb).ok_or(verb);
        let params = words.collect();

        Some(Message { command, params })
    }

    /// Returns true if the message has enough parameters for its command.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lonely_tokens::Message;
    /// let nick = Message::parse("NICK ryan").unwrap();
    /// assert_eq!(nick.has_enough_params(), true);
    ///
    /// let nick = Message::parse("NICK").unwrap();
    /// assert_eq!(nick.has_enough_params(), false);
    /// ```
    pub fn has_enough_params(&self) -> bool {
        match self.command {
            Ok(cmd) => cmd.required_params() <= self.params.len(),
            Err(_) => false,
        }
    }
}

// mod tests
