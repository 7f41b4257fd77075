//! Runtime control utils.
//!
//! lonely-ircd is built on tokio.  The main thing this module does is create the runtime, start
//! one task per binding, and stop everything when the operator asks for it.
//!
//! # Top-level tasks
//!
//! Bindings are tasks that bind then listen on a port.  They are defined in `net::listen`.  They
//! run with two data "channels":
//!
//! - A "stop button":  the binding task sends its listening address when it fails to bind,
//! - A shutdown flag:  when it flips to `true`, bindings stop accepting connections, and
//!   connection tasks close their stream.
//!
//! The configuration file is read once, at startup, before the runtime is created since the number
//! of workers cannot be changed afterwards.

use crate::config::{Binding, Config};
use crate::net;
use crate::state::Settings;
use crate::tls;
use std::net::SocketAddr;
use std::sync::Arc;
use std::{io, process};
use tokio::runtime as rt;
use tokio::sync::{mpsc, watch};

/// Creates a tokio runtime with the given number of worker threads.
fn create_runtime(workers: usize) -> rt::Runtime {
    let mut builder = rt::Builder::new_multi_thread();

    if workers != 0 {
        builder.worker_threads(workers);
    }

    builder
        .enable_all()
        .build()
        .unwrap_or_else(|err| {
            log::error!("Failed to start the tokio runtime: {}", err);
            process::exit(1);
        })
}

/// Creates the bindings tasks and spawns them on the runtime.
///
/// Exits the program if a TLS acceptor cannot be built.  Returns the listening addresses.
fn load_bindings(
    bindings: Vec<Binding>,
    settings: &Arc<Settings>,
    stop: &mpsc::Sender<SocketAddr>,
    shutdown: &watch::Receiver<bool>,
) -> Vec<SocketAddr> {
    let mut res = Vec::with_capacity(bindings.len());
    let mut store = tls::IdentityStore::default();

    for Binding { address, tls } in bindings {
        let acceptor = match tls {
            Some(tls) => match store.acceptor(&tls) {
                Ok(acceptor) => Some(acceptor),
                Err(_) => process::exit(1),
            },
            None => None,
        };
        let server = net::listen(
            address,
            settings.clone(),
            acceptor,
            stop.clone(),
            shutdown.clone(),
        );
        res.push(address);
        tokio::spawn(server);
    }

    res
}

/// Resolves on SIGINT, or SIGTERM on UNIX systems.
async fn interrupted() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix;

        let mut terminate = unix::signal(unix::SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Reads the configuration at `config_path`, or uses the defaults when there is none, then runs
/// the server until it is interrupted.
pub fn load_config_and_run(config_path: Option<String>) {
    let cfg = match config_path {
        Some(config_path) => Config::from_file(&config_path).unwrap_or_else(|err| {
            log::error!("Failed to read {:?}: {}", config_path, err);
            process::exit(1);
        }),
        None => {
            log::info!("No configuration file given, using the defaults");
            Config::sample()
        }
    };

    let runtime = create_runtime(cfg.workers);

    runtime.block_on(run(cfg));
}

pub async fn run(cfg: Config) {
    let (stop, mut failures) = mpsc::channel(8);
    let (shutdown, shutdown_rx) = watch::channel(false);

    let settings = Arc::new(Settings::new(cfg.state));
    let mut bindings = load_bindings(cfg.bindings, &settings, &stop, &shutdown_rx);
    drop(stop);

    let interrupted = interrupted();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            addr = failures.recv() => match addr {
                Some(addr) => bindings.retain(|binding| *binding != addr),
                None => {
                    // `failures.recv()` returns `None` when all senders have been dropped, so
                    // when all bindings tasks have stopped.
                    log::error!("No binding left, exiting.");
                    process::exit(1);
                }
            },
            res = &mut interrupted => {
                if let Err(err) = res {
                    log::error!("Cannot listen for signals: {}", err);
                    process::exit(1);
                }
                log::info!("Interrupted, closing {} binding(s) and their connections", bindings.len());
                break;
            },
        }
    }

    let _ = shutdown.send(true);
}
