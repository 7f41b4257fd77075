//! RFC2812 implementation
//!
//! <https://tools.ietf.org/html/rfc2812.html>
//!
//! Channels have no state: JOIN, NAMES, MODE and friends answer as if the client was alone in
//! whatever channel it names.

use crate::lines;
use lonely_tokens::{is_channel, rpl, Buffer, Command, ReplyBuffer};
use super::SERVER_VERSION;

/// User modes advertised in RPL_MYINFO.
const USER_MODES: &str = "io";

/// Channel modes advertised in RPL_MYINFO.
const CHANNEL_MODES: &str = "b";

/// Sends the list of nicknames in the channel `channel_name`: only the client, as an operator.
fn write_names(rb: &mut ReplyBuffer<'_>, nick: &str, channel_name: &str) {
    rb.reply(rpl::NAMREPLY)
        .param("=")
        .param(channel_name)
        .fmt_trailing_param(format_args!("@{}", nick));
    rb.reply(rpl::ENDOFNAMES).param(channel_name).trailing_param(lines::END_OF_NAMES);
}

// Command handlers
impl super::State {
    // JOIN

    pub fn cmd_join(&self, out: &mut Buffer, targets: &str) {
        let session = &self.session;
        let full_name = session.full_name();
        let mut rb = ReplyBuffer::new(out, session.server(), session.nick());

        for channel_name in targets.split(',') {
            rb.message(&full_name, Command::Join).param(channel_name);
            write_names(&mut rb, session.nick(), channel_name);
        }
    }

    // MODE

    pub fn cmd_mode(&self, out: &mut Buffer, target: &str, modes: Option<&str>) {
        let session = &self.session;
        let mut rb = ReplyBuffer::new(out, session.server(), session.nick());

        match modes {
            Some("b") if is_channel(target) => {
                rb.reply(rpl::ENDOFBANLIST).param(target).trailing_param(lines::END_OF_BAN_LIST);
            }
            Some(modes) if is_channel(target) => {
                log::debug!("{}: channel mode {:?} not supported, no reply", self.addr, modes);
            }
            Some(modes) => {
                rb.prefixed_message(Command::Mode).param(target).fmt_param(modes);
            }
            None if is_channel(target) => {
                rb.reply(rpl::CHANNELMODEIS).param(target).param("+");
                rb.reply(rpl::CREATIONTIME).param(target).fmt_param(crate::util::time());
            }
            None => {
                rb.reply(rpl::UMODEIS).param("+");
            }
        }
    }

    // NAMES

    pub fn cmd_names(&self, out: &mut Buffer, targets: &str) {
        let session = &self.session;
        let mut rb = ReplyBuffer::new(out, session.server(), session.nick());

        for channel_name in targets.split(',') {
            write_names(&mut rb, session.nick(), channel_name);
        }
    }

    // NICK

    pub fn cmd_nick(&mut self, out: &mut Buffer, nick: &str) {
        if self.session.is_registered() {
            let old_name = self.session.full_name();
            out.message(&old_name, Command::Nick).param(nick);
            log::debug!("{}: {} is now known as {}", self.addr, self.session.nick(), nick);
        }
        self.session.set_nick(nick);
    }

    // PART

    pub fn cmd_part(&self, out: &mut Buffer, targets: &str) {
        let full_name = self.session.full_name();

        for channel_name in targets.split(',') {
            out.message(&full_name, Command::Part).param(channel_name);
        }
    }

    // PING

    pub fn cmd_ping(&self, out: &mut Buffer, payload: &str) {
        out.message("", Command::Pong).fmt_param(payload);
    }

    // QUIT

    pub fn cmd_quit(&self, out: &mut Buffer) {
        let session = &self.session;
        out.message("", Command::Error)
            .fmt_trailing_param(lines_closing_link!(session.nick(), session.host()));
    }

    // TOPIC

    pub fn cmd_topic(&self, out: &mut Buffer, target: &str) {
        let session = &self.session;
        let mut rb = ReplyBuffer::new(out, session.server(), session.nick());

        rb.reply(rpl::NOTOPIC).param(target).trailing_param(lines::NO_TOPIC);
    }

    // USER

    pub fn cmd_user(&mut self, out: &mut Buffer, user: &str, host: &str, server: &str,
                    real: &[&str])
    {
        let real = real.join(" ");
        let real = real.strip_prefix(':').unwrap_or(&real);
        if !self.session.set_user(user, host, server, real) {
            log::debug!("{}: USER sent again, keeping {}", self.addr, self.session.full_name());
        }
        self.write_welcome(out);
    }

    // WHO

    pub fn cmd_who(&self, out: &mut Buffer, mask: &str) {
        let session = &self.session;
        let mut rb = ReplyBuffer::new(out, session.server(), session.nick());

        rb.reply(rpl::WHOREPLY)
            .param(mask)
            .param(session.user())
            .param(session.host())
            .param(session.server())
            .param(session.nick())
            .param("H@")
            .fmt_trailing_param(format_args!("0 {}", session.realname()));
        rb.reply(rpl::ENDOFWHO).param(mask).trailing_param(lines::END_OF_WHO);
    }

    /// Sends welcome messages.  Called when a client has sent "USER".
    fn write_welcome(&self, out: &mut Buffer) {
        let session = &self.session;
        let full_name = session.full_name();
        let server = session.server();
        let mut rb = ReplyBuffer::new(out, server, session.nick());

        rb.reply(rpl::WELCOME).fmt_trailing_param(lines_welcome!(full_name));
        rb.reply(rpl::YOURHOST).fmt_trailing_param(lines_your_host!(server, SERVER_VERSION));
        rb.reply(rpl::CREATED).fmt_trailing_param(lines_created!(self.settings.created_at));
        rb.reply(rpl::MYINFO)
            .param(server)
            .param(SERVER_VERSION)
            .param(USER_MODES)
            .param(CHANNEL_MODES);
        rb.reply(rpl::MOTDSTART).fmt_trailing_param(lines_motd_start!(server));
        rb.reply(rpl::MOTD).fmt_trailing_param(lines_motd!(self.settings.motd));
        rb.reply(rpl::ENDOFMOTD).trailing_param(lines::END_OF_MOTD);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test::*;
    use super::super::{Error, Flow};
    use lonely_tokens::Command;

    #[test]
    fn test_nick_before_registration() {
        let mut state = simple_state();

        let (flow, out) = handle_message(&mut state, "NICK bob").unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, "");
        assert_eq!(state.session().nick(), "bob");

        let (_, out) = handle_message(&mut state, "NICK bobby").unwrap();
        assert_eq!(out, "");
        assert_eq!(state.session().nick(), "bobby");
    }

    #[test]
    fn test_nick_after_registration() {
        let mut state = registered_state("bob");

        let (flow, out) = handle_message(&mut state, "NICK alice").unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_msgs(&out, &[":bob!u@h NICK alice"]);
        assert_eq!(state.session().nick(), "alice");

        let (_, out) = handle_message(&mut state, "NICK carol").unwrap();
        assert_msgs(&out, &[":alice!u@h NICK carol"]);
    }

    #[test]
    fn test_nick_completes_registration_silently() {
        let mut state = simple_state();

        let (_, out) = handle_message(&mut state, "USER u h s :Real Name").unwrap();
        assert_eq!(lines(&out).len(), 7);
        assert!(!state.session().is_registered());

        let (_, out) = handle_message(&mut state, "NICK bob").unwrap();
        assert_eq!(out, "");
        assert!(state.session().is_registered());
    }

    #[test]
    fn test_registration() {
        let mut state = simple_state();

        handle_message(&mut state, "NICK bob").unwrap();
        let (flow, out) = handle_message(&mut state, "USER u h s :Real Name").unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_msgs(&out, &[
            ":s 001 bob :Welcome to the Internet Relay Network bob!u@h",
            ":s 002 bob :Your host is s, running version lonely-ircd-1.0.0",
            ":s 003 bob :This server was created 2020-04-01T12:00:00Z",
            ":s 004 bob s lonely-ircd-1.0.0 io b",
            ":s 375 bob :- s Message of the day -",
            ":s 372 bob :- Nobody else is here.",
            ":s 376 bob :End of MOTD command",
        ]);
        assert_eq!(state.session().realname(), "Real Name");
        assert!(state.session().is_registered());
    }

    #[test]
    fn test_user_realname() {
        let tests = &[
            ("USER u h s :Real Name", "Real Name"),
            ("USER u h s Real Name", "Real Name"),
            ("USER u h s ::colons:", ":colons:"),
            ("USER u h s :Real  Name ", "Real  Name "),
            ("USER u h s :", ""),
        ];

        for (line, expected) in tests {
            let mut state = simple_state();
            handle_message(&mut state, line).unwrap();
            assert_eq!(state.session().realname(), *expected, "{:?}", line);
        }
    }

    #[test]
    fn test_user_twice() {
        let mut state = registered_state("bob");

        let (_, out) = handle_message(&mut state, "USER v i t :Other").unwrap();
        let out = lines(&out);
        assert_eq!(out.len(), 7);
        assert_eq!(out[0], ":s 001 bob :Welcome to the Internet Relay Network bob!u@h");
        assert_eq!(state.session().realname(), "Real Name");
    }

    #[test]
    fn test_join() {
        let mut state = registered_state("bob");

        let (_, out) = handle_message(&mut state, "JOIN #a,#b").unwrap();
        assert_msgs(&out, &[
            ":bob!u@h JOIN #a",
            ":s 353 bob = #a :@bob",
            ":s 366 bob #a :End of NAMES list",
            ":bob!u@h JOIN #b",
            ":s 353 bob = #b :@bob",
            ":s 366 bob #b :End of NAMES list",
        ]);
    }

    #[test]
    fn test_part() {
        let mut state = registered_state("bob");

        let (_, out) = handle_message(&mut state, "PART #never,#joined").unwrap();
        assert_msgs(&out, &[":bob!u@h PART #never", ":bob!u@h PART #joined"]);
    }

    #[test]
    fn test_names() {
        let mut state = registered_state("bob");

        let (_, out) = handle_message(&mut state, "NAMES #a,#b").unwrap();
        assert_msgs(&out, &[
            ":s 353 bob = #a :@bob",
            ":s 366 bob #a :End of NAMES list",
            ":s 353 bob = #b :@bob",
            ":s 366 bob #b :End of NAMES list",
        ]);
    }

    #[test]
    fn test_topic() {
        let mut state = registered_state("bob");

        let (_, out) = handle_message(&mut state, "TOPIC #a").unwrap();
        assert_msgs(&out, &[":s 331 bob #a :No topic is set"]);

        let (_, out) = handle_message(&mut state, "TOPIC #a :new topic").unwrap();
        assert_msgs(&out, &[":s 331 bob #a :No topic is set"]);
    }

    #[test]
    fn test_mode_channel() {
        let mut state = registered_state("bob");

        let (_, out) = handle_message(&mut state, "MODE #chan b").unwrap();
        assert_msgs(&out, &[":s 368 bob #chan :End of channel ban list"]);

        let (_, out) = handle_message(&mut state, "MODE #chan x").unwrap();
        assert_eq!(out, "");

        let (_, out) = handle_message(&mut state, "MODE #chan").unwrap();
        let out = lines(&out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], ":s 324 bob #chan +");
        let time = out[1].strip_prefix(":s 329 bob #chan ").unwrap();
        assert!(time.parse::<u64>().is_ok(), "{:?}", out[1]);
    }

    #[test]
    fn test_mode_user() {
        let mut state = registered_state("bob");

        let (_, out) = handle_message(&mut state, "MODE bob +i").unwrap();
        assert_msgs(&out, &[":s MODE bob +i"]);

        let (_, out) = handle_message(&mut state, "MODE bob").unwrap();
        assert_msgs(&out, &[":s 221 bob +"]);
    }

    #[test]
    fn test_who() {
        let mut state = registered_state("bob");

        let (_, out) = handle_message(&mut state, "WHO #a").unwrap();
        assert_msgs(&out, &[
            ":s 352 bob #a u h s bob H@ :0 Real Name",
            ":s 315 bob #a :End of WHO list",
        ]);
    }

    #[test]
    fn test_ping() {
        let mut state = simple_state();

        let (_, out) = handle_message(&mut state, "PING abc123").unwrap();
        assert_msgs(&out, &["PONG abc123"]);

        let (_, out) = handle_message(&mut state, "PING :LAG\t1592;x").unwrap();
        assert_msgs(&out, &["PONG :LAG\t1592;x"]);

        let mut state = registered_state("bob");
        let (_, out) = handle_message(&mut state, "PING abc123").unwrap();
        assert_msgs(&out, &["PONG abc123"]);
    }

    #[test]
    fn test_quit() {
        let mut state = registered_state("bob");

        let (flow, out) = handle_message(&mut state, "QUIT :bye").unwrap();
        assert_eq!(flow, Flow::Close);
        assert_msgs(&out, &["ERROR :Closing Link: bob[h] (Quit)"]);

        let mut state = simple_state();
        let (flow, out) = handle_message(&mut state, "QUIT").unwrap();
        assert_eq!(flow, Flow::Close);
        assert_msgs(&out, &["ERROR :Closing Link: *[*] (Quit)"]);
    }

    #[test]
    fn test_unregistered_commands_are_dropped() {
        let lines = &[
            "JOIN #a", "PART #a", "NAMES #a", "TOPIC #a", "MODE #a b", "MODE bob", "WHO #a",
            "JOIN", "WHO",
        ];

        let mut state = simple_state();
        handle_message(&mut state, "NICK bob").unwrap();
        for line in lines {
            let (flow, out) = handle_message(&mut state, line).unwrap();
            assert_eq!(flow, Flow::Continue, "{:?}", line);
            assert_eq!(out, "", "{:?}", line);
        }
        assert_eq!(state.session().nick(), "bob");
        assert!(!state.session().is_registered());
    }

    #[test]
    fn test_unknown_commands_are_dropped() {
        let mut state = registered_state("bob");

        for line in &["PRIVMSG #a :hello?", "join #a", "PONG abc", "ERROR :nope", " JOIN #a"] {
            let (flow, out) = handle_message(&mut state, line).unwrap();
            assert_eq!(flow, Flow::Continue, "{:?}", line);
            assert_eq!(out, "", "{:?}", line);
        }
    }

    #[test]
    fn test_missing_params() {
        let tests = &[
            ("NICK", Command::Nick, 1, 0),
            ("USER u h s", Command::User, 4, 3),
            ("PING", Command::Ping, 1, 0),
            ("JOIN", Command::Join, 1, 0),
            ("MODE", Command::Mode, 1, 0),
        ];

        for (line, command, required, given) in tests {
            let mut state = registered_state("bob");
            let expected = Error::NeedMoreParams {
                command: *command,
                required: *required,
                given: *given,
            };
            assert_eq!(handle_message(&mut state, line), Err(expected), "{:?}", line);
        }
    }
}
