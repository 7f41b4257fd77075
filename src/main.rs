//! lonely-ircd, the IRC server where you are never bothered by anyone.
//!
//! Every connection gets its own private network: registration, channels, topics, WHO and
//! NAMES all work, but nobody else is ever there.
//!
//! # Usage
//!
//! ```console
//! lonely-ircd [CONFIG_FILE]
//! ```
//!
//! The git repository contains an example `doc/lonely.conf`, with comments describing the
//! different options.  Without a configuration file, the server listens on 127.0.0.1:6667.

#![forbid(unsafe_code)]
#![warn(clippy::all, rust_2018_idioms)]
#![allow(clippy::shadow_unrelated, clippy::use_self)]

use std::{env, process};

mod config;
mod control;
#[macro_use]
mod lines;
mod net;
mod reader;
mod session;
mod state;
mod tls;
mod util;

pub fn main() {
    if cfg!(debug_assertions) {
        env::set_var("RUST_BACKTRACE", "1");
    }

    let log_settings = env_logger::Env::new()
        .filter_or("LONELY_LOG", "lonely_ircd=info")
        .write_style("LONELY_LOG_STYLE");
    env_logger::Builder::from_env(log_settings)
        .format(|buf, r| {
            use std::io::Write;
            writeln!(buf, "[{:<5} {}] {}", r.level(), r.target(), r.args())
        })
        .init();

    let config_path = parse_args();
    control::load_config_and_run(config_path);
}

fn parse_args() -> Option<String> {
    let mut args = env::args();

    let program = args.next().unwrap_or_else(|| String::from("lonely-ircd"));
    let config_path = args.next()?;

    if config_path == "-h" || config_path == "--help" {
        eprintln!("lonely-ircd {}", env!("CARGO_PKG_VERSION"));
        eprintln!("Usage: {} [CONFIG_FILE]", program);
        process::exit(0);
    } else if config_path == "-v" || config_path == "--version" {
        eprintln!("lonely-ircd {}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    if args.next().is_some() {
        eprintln!("Usage: {} [CONFIG_FILE]", program);
        process::exit(1);
    }

    Some(config_path)
}
