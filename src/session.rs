//! Per-connection client data and registration state.

use lonely_tokens::Command;

/// What the server knows about the client at the other end of a connection.
///
/// A session is created empty when the connection is accepted, and is only ever touched by the
/// task that handles this connection.
#[derive(Debug, Default)]
pub struct Session {
    /// The nickname, set by the first "NICK" and changed by the following ones.
    nickname: Option<String>,

    /// The username, hostname and servername given by "USER".
    ///
    /// They are set together, once.
    username: Option<String>,
    hostname: Option<String>,
    servername: Option<String>,

    /// The real name, from the trailing words of "USER".
    realname: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the client is in the registration process.
    ///
    /// This is computed from the session fields every time, there is no stored state to keep in
    /// sync.
    pub fn registration(&self) -> RegistrationState {
        match (&self.nickname, &self.username) {
            (None, None) => RegistrationState::Stranger,
            (Some(_), None) => RegistrationState::NickGiven,
            (None, Some(_)) => RegistrationState::UserGiven,
            (Some(_), Some(_)) => RegistrationState::Registered,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registration().is_registered()
    }

    /// Whether or not the client can issue the given command in its current state.
    pub fn can_issue_command(&self, cmd: Command) -> bool {
        self.registration().accepts(cmd)
    }

    /// The nickname of the client, or "*" when it has not sent any.
    pub fn nick(&self) -> &str {
        self.nickname.as_deref().unwrap_or("*")
    }

    pub fn user(&self) -> &str {
        self.username.as_deref().unwrap_or("*")
    }

    pub fn host(&self) -> &str {
        self.hostname.as_deref().unwrap_or("*")
    }

    /// The server name the client gave in "USER".  Replies use it as their prefix.
    pub fn server(&self) -> &str {
        self.servername.as_deref().unwrap_or("*")
    }

    pub fn realname(&self) -> &str {
        &self.realname
    }

    /// The identity of the client, in the form `nick!user@host`.
    pub fn full_name(&self) -> String {
        format!("{}!{}@{}", self.nick(), self.user(), self.host())
    }

    /// Change the nickname of the client.
    pub fn set_nick(&mut self, nick: &str) {
        self.nickname = Some(nick.to_owned());
    }

    /// Sets the fields given by "USER".
    ///
    /// Returns false and leaves the session untouched if they have already been set.
    pub fn set_user(&mut self, user: &str, host: &str, server: &str, real: &str) -> bool {
        if self.username.is_some() {
            return false;
        }
        self.username = Some(user.to_owned());
        self.hostname = Some(host.to_owned());
        self.servername = Some(server.to_owned());
        self.realname = real.to_owned();
        true
    }
}

/// A state machine that represents a registration (process of sending "NICK" and "USER").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationState {
    /// The client hasn't began the registration.
    Stranger,

    /// The client has sent one or more "NICK", but has not sent any "USER".
    NickGiven,

    /// The client has sent a "USER", but has not sent any "NICK".
    UserGiven,

    /// The client has sent a "USER" and a "NICK", and completed its registration.
    Registered,
}

impl RegistrationState {
    /// True iff self == RegistrationState::Registered.
    pub fn is_registered(self) -> bool {
        self == RegistrationState::Registered
    }

    /// Whether the given command has any effect in this state.
    ///
    /// Before registration, only "NICK", "USER", "PING" and "QUIT" are honored.
    pub fn accepts(self, cmd: Command) -> bool {
        match cmd {
            Command::Nick | Command::User | Command::Ping | Command::Quit => true,
            _ => self.is_registered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration() {
        let mut session = Session::new();
        assert_eq!(session.registration(), RegistrationState::Stranger);

        session.set_nick("bob");
        assert_eq!(session.registration(), RegistrationState::NickGiven);
        session.set_nick("alice");
        assert_eq!(session.registration(), RegistrationState::NickGiven);

        assert!(session.set_user("u", "h", "s", "Real Name"));
        assert_eq!(session.registration(), RegistrationState::Registered);
        assert_eq!(session.full_name(), "alice!u@h");

        let mut session = Session::new();
        assert!(session.set_user("u", "h", "s", ""));
        assert_eq!(session.registration(), RegistrationState::UserGiven);
        assert!(!session.is_registered());
        session.set_nick("bob");
        assert!(session.is_registered());
    }

    #[test]
    fn test_user_is_set_once() {
        let mut session = Session::new();
        assert!(session.set_user("u", "h", "s", "Real Name"));
        assert!(!session.set_user("v", "i", "t", "Other"));
        assert_eq!(session.user(), "u");
        assert_eq!(session.host(), "h");
        assert_eq!(session.server(), "s");
        assert_eq!(session.realname(), "Real Name");
    }

    #[test]
    fn test_command_gate() {
        use RegistrationState::*;

        for state in &[Stranger, NickGiven, UserGiven] {
            assert!(state.accepts(Command::Nick));
            assert!(state.accepts(Command::User));
            assert!(state.accepts(Command::Ping));
            assert!(state.accepts(Command::Quit));
            assert!(!state.accepts(Command::Join));
            assert!(!state.accepts(Command::Mode));
            assert!(!state.accepts(Command::Who));
            assert!(!state.accepts(Command::Pong));
        }
        assert!(Registered.accepts(Command::Join));
        assert!(Registered.accepts(Command::Topic));
    }

    #[test]
    fn test_placeholders() {
        let session = Session::new();
        assert_eq!(session.nick(), "*");
        assert_eq!(session.full_name(), "*!*@*");
    }
}
