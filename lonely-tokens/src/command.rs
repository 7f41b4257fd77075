use std::fmt;

macro_rules! commands {
    ( $( $cmd:ident $cmd_str:literal $n:literal )* ) => {
        /// The list of known commands.
        ///
        /// Unknown verbs are kept as strings by `Message` directly, this enum just contains the
        /// verbs the server knows about.
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum Command {
            $( $cmd, )*
            Reply(&'static str),
        }

        impl Command {
            /// From a given command string, returns the corresponding command, or `None`
            /// otherwise.
            ///
            /// The lookup is case-sensitive: clients are expected to send verbs in upper-case.
            ///
            /// # Example
            ///
            /// ```rust
            /// # use lonely_tokens::Command;
            /// let join = Command::parse("JOIN");
            /// let lower_join = Command::parse("join");
            /// let not_join = Command::parse("NOT_JOIN");
            ///
            /// assert_eq!(join, Some(Command::Join));
            /// assert_eq!(lower_join, None);
            /// assert_eq!(not_join, None);
            /// ```
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                $(
                    $cmd_str => Some(Command::$cmd),
                )*
                    _ => None,
                }
            }

            /// Returns the number of required arguments for the command.
            ///
            /// The command may accept more arguments.
            ///
            /// # Example
            ///
            /// ```rust
            /// # use lonely_tokens::Command;
            /// let user = Command::parse("USER").unwrap();
            /// let quit = Command::parse("QUIT").unwrap();
            ///
            /// assert_eq!(user.required_params(), 4);
            /// assert_eq!(quit.required_params(), 0);
            /// ```
            pub fn required_params(&self) -> usize {
                match self {
                $(
                    Command::$cmd => $n,
                )*
                    Command::Reply(_) => 0,
                }
            }

            /// Returns the command string.
            ///
            /// # Example
            ///
            /// ```rust
            /// # use lonely_tokens::{Command, rpl};
            /// assert_eq!(Command::Pong.as_str(), "PONG");
            /// assert_eq!(Command::from(rpl::WELCOME).as_str(), "001");
            /// ```
            pub fn as_str(&self) -> &'static str {
                match self {
                $(
                    Command::$cmd => $cmd_str,
                )*
                    Command::Reply(s) => *s,
                }
            }
        }

        impl From<&'static str> for Command {
            /// `&'static str`s are converted to the `Command::Reply` variant.
            ///
            /// This trait is used by `Buffer` to accept both `Command` and numerics when
            /// building messages.
            fn from(reply: &'static str) -> Self {
                Command::Reply(reply)
            }
        }

        impl fmt::Display for Command {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.as_str().fmt(f)
            }
        }
    }
}

commands! {
//  Ident.   String     Minimum # of params
    Error    "ERROR"    1
    Join     "JOIN"     1
    Mode     "MODE"     1
    Names    "NAMES"    1
    Nick     "NICK"     1
    Part     "PART"     1
    Ping     "PING"     1
    Pong     "PONG"     1
    Quit     "QUIT"     0
    Topic    "TOPIC"    1
    User     "USER"     4
    Who      "WHO"      1
}
