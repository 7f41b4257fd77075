//
// IRC replies
//

pub const END_OF_BAN_LIST: &str = "End of channel ban list";

pub const END_OF_MOTD: &str = "End of MOTD command";

pub const END_OF_NAMES: &str = "End of NAMES list";

pub const END_OF_WHO: &str = "End of WHO list";

pub const NO_TOPIC: &str = "No topic is set";

//
// Welcome messages
//

#[macro_export]
macro_rules! lines_welcome {
    ( $name:expr ) => {
        format_args!("Welcome to the Internet Relay Network {}", $name)
    };
}

#[macro_export]
macro_rules! lines_your_host {
    ( $host:expr, $version:expr ) => {
        format_args!("Your host is {}, running version {}", $host, $version)
    };
}

#[macro_export]
macro_rules! lines_created {
    ( $since:expr ) => {
        format_args!("This server was created {}", $since)
    };
}

#[macro_export]
macro_rules! lines_motd_start {
    ( $domain:expr ) => {
        format_args!("- {} Message of the day -", $domain)
    };
}

#[macro_export]
macro_rules! lines_motd {
    ( $line:expr ) => {
        format_args!("- {}", $line)
    };
}

//
// Network messages
//

#[macro_export]
macro_rules! lines_closing_link {
    ( $nick:expr, $host:expr ) => {
        format_args!("Closing Link: {}[{}] (Quit)", $nick, $host)
    };
}

/// The MOTD line used when the configuration doesn't set one.
pub const DEFAULT_MOTD: &str = "It's just you and me here.  Make yourself at home.";
