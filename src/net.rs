use crate::reader::IrcReader;
use crate::state::{self, Flow, Settings, State};
use crate::tls;
use lonely_tokens::{Buffer, Message};
use std::net::SocketAddr;
use std::sync::Arc;
use std::{fmt, mem};
use tokio::io::{self, AsyncRead, AsyncWrite, AsyncWriteExt as _};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};

/// Why a connection ended early.
#[derive(Debug)]
pub enum Error {
    /// The stream failed, or the client sent a line that is too long or not UTF-8.
    Io(io::Error),

    /// The client sent a command the server cannot handle.
    Protocol(state::Error),
}

impl From<io::Error> for Error {
    fn from(val: io::Error) -> Self { Self::Io(val) }
}

impl From<state::Error> for Error {
    fn from(val: state::Error) -> Self { Self::Protocol(val) }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => err.fmt(f),
            Self::Protocol(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Protocol(err) => Some(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Resolves once `true` has been sent on the shutdown channel.
///
/// Never resolves if the sender has been dropped without doing so.
pub async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}

/// Returns a future that listens, accepts and handles incoming connections.
///
/// When `acceptor` is `Some`, connections go through a TLS handshake first.  The listener stops
/// when `shutdown` flips to `true`.  If it fails to bind, it sends its address on `stop`.
pub async fn listen(
    address: SocketAddr,
    settings: Arc<Settings>,
    acceptor: Option<tls::Acceptor>,
    stop: mpsc::Sender<SocketAddr>,
    shutdown: watch::Receiver<bool>,
) {
    let ln = match TcpListener::bind(address).await {
        Ok(ln) => ln,
        Err(err) => {
            log::error!("Failed to listen to {}: {}", address, err);
            let _ = stop.send(address).await;
            return;
        }
    };

    if acceptor.is_some() {
        log::info!("Listening on {} for tls connections...", address);
    } else {
        log::info!("Listening on {} for plain-text connections...", address);
    }

    let stopped = wait_for_shutdown(shutdown.clone());
    tokio::pin!(stopped);

    loop {
        tokio::select! {
            res = ln.accept() => match res {
                Ok((conn, peer_addr)) => match &acceptor {
                    Some(acceptor) => {
                        let acceptor = acceptor.clone();
                        tokio::spawn(handle_tls(conn, peer_addr, settings.clone(), acceptor,
                                                shutdown.clone()));
                    }
                    None => {
                        tokio::spawn(handle(conn, peer_addr, settings.clone(), shutdown.clone()));
                    }
                },
                Err(err) => log::warn!("Failed to accept connection: {}", err),
            },
            _ = &mut stopped => {
                log::info!("Stopped listening on {}", address);
                return;
            }
        }
    }
}

#[cfg(feature = "tls")]
async fn handle_tls(
    conn: TcpStream,
    peer_addr: SocketAddr,
    settings: Arc<Settings>,
    acceptor: tls::Acceptor,
    shutdown: watch::Receiver<bool>,
) {
    let tls_conn = match acceptor.accept(conn).await {
        Ok(tls_conn) => tls_conn,
        Err(err) => {
            log::warn!("{}: TLS handshake failed: {}", peer_addr, err);
            return;
        }
    };
    handle(tls_conn, peer_addr, settings, shutdown).await;
}

#[cfg(not(feature = "tls"))]
async fn handle_tls(
    _conn: TcpStream,
    _peer_addr: SocketAddr,
    _settings: Arc<Settings>,
    acceptor: tls::Acceptor,
    _shutdown: watch::Receiver<bool>,
) {
    match acceptor {}
}

/// Returns a future that handles an IRC connection until the client quits, the stream ends or
/// fails, or the server shuts down.  The stream is closed afterwards.
async fn handle<S>(
    conn: S,
    peer_addr: SocketAddr,
    settings: Arc<Settings>,
    shutdown: watch::Receiver<bool>,
)
    where S: AsyncRead + AsyncWrite
{
    log::debug!("{}: connected", peer_addr);
    let (reader, mut writer) = io::split(conn);
    let mut reader = IrcReader::new(reader, settings.max_line_length());
    let mut state = State::new(peer_addr, settings);

    let res = tokio::select! {
        res = serve(peer_addr, &mut state, &mut reader, &mut writer) => res,
        _ = wait_for_shutdown(shutdown) => {
            log::debug!("{}: server is shutting down", peer_addr);
            Ok(())
        }
    };

    match res {
        Ok(()) => log::debug!("{}: {} disconnected", peer_addr, state.session().nick()),
        Err(Error::Io(err)) if err.kind() == io::ErrorKind::InvalidData => {
            log::warn!("{}: {}", peer_addr, err);
        }
        Err(Error::Io(err)) => log::debug!("{}: {}", peer_addr, err),
        Err(Error::Protocol(err)) => log::warn!("{}: {}", peer_addr, err),
    }

    let _ = writer.shutdown().await;
}

/// Reads lines and writes replies until the client is done.
async fn serve<R, W>(
    peer_addr: SocketAddr,
    state: &mut State,
    reader: &mut IrcReader<R>,
    writer: &mut W,
) -> Result<()>
    where R: AsyncRead + Unpin,
          W: AsyncWrite + Unpin,
{
    let mut out = Buffer::new();

    while let Some(line) = reader.read_message().await? {
        log::trace!("{} >> {}", peer_addr, line);
        let msg = match Message::parse(&line) {
            Some(msg) => msg,
            None => continue,
        };

        let flow = state.handle_message(&mut out, msg)?;

        if !out.is_empty() {
            let replies = mem::take(&mut out).build();
            for reply in replies.lines() {
                log::trace!("{} << {}", peer_addr, reply);
            }
            writer.write_all(replies.as_bytes()).await?;
            writer.flush().await?;
        }

        if flow == Flow::Close {
            break;
        }
    }

    Ok(())
}
