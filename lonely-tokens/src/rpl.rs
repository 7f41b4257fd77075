//! The list of IRC replies.
//!
//! Each reply must have the client's nick as first parameter.
//!
//! Sources:
//!
//! - <https://tools.ietf.org/html/rfc2812.html#section-5>
//! - <https://modern.ircdocs.horse/#numerics>

pub const WELCOME: &str  = "001";  // :Welcome message
pub const YOURHOST: &str = "002";  // :Your host is...
pub const CREATED: &str  = "003";  // :This server was created...
pub const MYINFO: &str   = "004";  // <servername> <version> <umodes> <chan modes>

pub const UMODEIS: &str = "221";  // <modes>

pub const ENDOFWHO: &str      = "315";  // <name> :End of WHO list
pub const CHANNELMODEIS: &str = "324";  // <channel> <modes> <mode params>
pub const CREATIONTIME: &str  = "329";  // <channel> <creation time>
pub const NOTOPIC: &str       = "331";  // <channel> :No topic is set
pub const WHOREPLY: &str      = "352";  // <channel> <user> <host> <server> <nick> "H"/"G" ["*"] [("@"/"+")] :<hop count> <real name>
pub const NAMREPLY: &str      = "353";  // <=/*/@> <channel> :1*(@/ /+user)
pub const ENDOFNAMES: &str    = "366";  // <channel> :End of NAMES list
pub const ENDOFBANLIST: &str  = "368";  // <channel> :End of channel ban list
pub const MOTD: &str          = "372";  // :- <text>
pub const MOTDSTART: &str     = "375";  // :- <servername> Message of the day -
pub const ENDOFMOTD: &str     = "376";  // :End of MOTD command
