//! Configuration structures.
//!
//! See [`doc/lonely.conf`][1] on the repository for an explanation of each setting.
//!
//! [1]: ../doc/lonely.conf

use crate::lines;
use std::{fmt, fs, io, net, path, str};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Format(scfg::ParseError),
    Invalid(&'static str, String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Invalid(..) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(val: io::Error) -> Self { Self::Io(val) }
}

impl From<scfg::ParseError> for Error {
    fn from(val: scfg::ParseError) -> Self { Self::Format(val) }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => err.fmt(f),
            Self::Format(err) => err.fmt(f),
            Self::Invalid(directive, msg) => write!(f, "{:?} {}", directive, msg),
        }
    }
}

/// TLS versions that can be enabled with the `protocols` directive.
pub const PROTOCOLS: &[&str] = &["tls1.2", "tls1.3"];

/// TLS-related and needed information for TLS bindings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tls {
    pub certificate: path::PathBuf,
    pub key: path::PathBuf,

    /// Names of the allowed cipher suites, or empty for the library defaults.
    pub ciphers: Vec<String>,

    /// Allowed TLS versions (elements of `PROTOCOLS`), or empty for the library defaults.
    pub protocols: Vec<String>,

    pub dhparams: Option<path::PathBuf>,
}

/// Listening address + port + optional TLS settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub address: net::SocketAddr,
    pub tls: Option<Tls>,
}

/// Settings for `state::State`.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    /// The text of the single 372 line sent at registration.
    pub motd: String,

    /// Lines longer than this, in bytes, end the connection.
    pub max_line_length: usize,
}

/// The whole configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub bindings: Vec<Binding>,
    pub workers: usize,
    pub state: State,
}

fn bindings() -> Vec<Binding> {
    vec![Binding {
        address: net::SocketAddr::from(([127, 0, 0, 1], 6667)),
        tls: None,
    }]
}

fn motd() -> String { String::from(lines::DEFAULT_MOTD) }
fn max_line_length() -> usize { 8192 }

impl State {
    pub fn sample() -> Self {
        Self {
            motd: motd(),
            max_line_length: max_line_length(),
        }
    }
}

impl Config {
    pub fn sample() -> Self {
        Self {
            bindings: bindings(),
            workers: 0,
            state: State::sample(),
        }
    }

    /// Reads the configuration file at the given path.
    pub fn from_file(path: impl AsRef<path::Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }
}

impl str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let doc: scfg::Scfg = s.parse()?;
        let mut res = Self::sample();

        let mut bindings = Vec::new();
        for directive in doc.get_all("bind_to").into_iter().flatten() {
            bindings.push(parse_binding(directive)?);
        }
        if !bindings.is_empty() {
            res.bindings = bindings;
        }

        if let Some(directive) = doc.get("workers") {
            res.workers = parse_value(directive, "workers", "a positive integer")?;
        }
        if let Some(directive) = doc.get("motd") {
            let motd = single_param(directive, "motd")?;
            if motd.contains(|c: char| c == '\r' || c == '\n') {
                return Err(Error::Invalid("motd", "must fit on one line".to_owned()));
            }
            res.state.motd = motd.to_owned();
        }
        if let Some(directive) = doc.get("max_line_length") {
            res.state.max_line_length =
                parse_value(directive, "max_line_length", "a positive integer")?;
            if res.state.max_line_length == 0 {
                return Err(Error::Invalid("max_line_length", "must not be 0".to_owned()));
            }
        }

        Ok(res)
    }
}

fn single_param<'a>(directive: &'a scfg::Directive, name: &'static str) -> Result<&'a str> {
    match directive.params() {
        [value] => Ok(value.as_str()),
        _ => Err(Error::Invalid(name, "expects exactly one value".to_owned())),
    }
}

fn parse_value<T>(directive: &scfg::Directive, name: &'static str, what: &str) -> Result<T>
    where T: str::FromStr
{
    single_param(directive, name)?
        .parse()
        .map_err(|_| Error::Invalid(name, format!("must be {}", what)))
}

fn parse_binding(directive: &scfg::Directive) -> Result<Binding> {
    let address = parse_value(directive, "bind_to", "an address like 127.0.0.1:6667 or [::1]:6667")?;
    let tls = directive.child().map(parse_tls).transpose()?;
    Ok(Binding { address, tls })
}

fn parse_tls(block: &scfg::Scfg) -> Result<Tls> {
    let certificate = match block.get("certificate") {
        Some(directive) => single_param(directive, "certificate")?.into(),
        None => return Err(Error::Invalid("certificate", "is missing from the TLS block".to_owned())),
    };
    let key = match block.get("key") {
        Some(directive) => single_param(directive, "key")?.into(),
        None => return Err(Error::Invalid("key", "is missing from the TLS block".to_owned())),
    };
    let ciphers = block.get("ciphers")
        .map_or_else(Vec::new, |directive| directive.params().to_vec());
    let protocols = block.get("protocols")
        .map_or_else(Vec::new, |directive| directive.params().to_vec());
    if let Some(unknown) = protocols.iter().find(|p| !PROTOCOLS.contains(&p.as_str())) {
        let msg = format!("does not know {:?}, use one of {:?}", unknown, PROTOCOLS);
        return Err(Error::Invalid("protocols", msg));
    }
    let dhparams = block.get("dhparams")
        .map(|directive| single_param(directive, "dhparams").map(path::PathBuf::from))
        .transpose()?;

    Ok(Tls { certificate, key, ciphers, protocols, dhparams })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let cfg: Config = "".parse().unwrap();
        assert_eq!(cfg, Config::sample());
    }

    #[test]
    fn test_full_config() {
        let cfg: Config = r#"
bind_to 127.0.0.1:6667
bind_to [::]:6697 {
    certificate /etc/lonely/cert.pem
    key /etc/lonely/key.pem
    ciphers TLS13_AES_256_GCM_SHA384 TLS13_CHACHA20_POLY1305_SHA256
    protocols tls1.3
    dhparams /etc/lonely/dh.pem
}
workers 2
motd "Nobody else is here."
max_line_length 512
"#.parse().unwrap();

        assert_eq!(cfg.bindings.len(), 2);
        assert_eq!(cfg.bindings[0], bindings()[0]);
        assert_eq!(cfg.bindings[1].address, "[::]:6697".parse::<net::SocketAddr>().unwrap());
        let tls = cfg.bindings[1].tls.as_ref().unwrap();
        assert_eq!(tls.certificate, path::PathBuf::from("/etc/lonely/cert.pem"));
        assert_eq!(tls.key, path::PathBuf::from("/etc/lonely/key.pem"));
        assert_eq!(tls.ciphers, vec!["TLS13_AES_256_GCM_SHA384", "TLS13_CHACHA20_POLY1305_SHA256"]);
        assert_eq!(tls.protocols, vec!["tls1.3"]);
        assert_eq!(tls.dhparams, Some(path::PathBuf::from("/etc/lonely/dh.pem")));
        assert_eq!(cfg.workers, 2);
        assert_eq!(cfg.state.motd, "Nobody else is here.");
        assert_eq!(cfg.state.max_line_length, 512);
    }

    #[test]
    fn test_sample_file() {
        let cfg: Config = include_str!("../doc/lonely.conf").parse().unwrap();
        assert_eq!(cfg, Config::sample());
    }

    #[test]
    fn test_invalid_configs() {
        let tests = &[
            ("bind_to localhost", "bind_to"),
            ("bind_to 127.0.0.1:6667 127.0.0.1:6668", "bind_to"),
            ("bind_to 127.0.0.1:6697 {\n key key.pem\n}", "certificate"),
            ("bind_to 127.0.0.1:6697 {\n certificate cert.pem\n}", "key"),
            ("bind_to 127.0.0.1:6697 {\n certificate c\n key k\n protocols ssl3\n}", "protocols"),
            ("workers many", "workers"),
            ("max_line_length 0", "max_line_length"),
        ];

        for (input, expected) in tests {
            match input.parse::<Config>() {
                Err(Error::Invalid(directive, _)) => assert_eq!(directive, *expected, "{:?}", input),
                Err(err) => panic!("{:?}: unexpected error {}", input, err),
                Ok(_) => panic!("{:?}: should not parse", input),
            }
        }
    }
}
