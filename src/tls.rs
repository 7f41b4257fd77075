//! TLS acceptors for the bindings that have a TLS block.

#[cfg(feature = "tls")]
pub use tls_enabled::{Acceptor, IdentityStore};

#[cfg(not(feature = "tls"))]
pub use tls_disabled::{Acceptor, IdentityStore};

#[cfg(feature = "tls")]
mod tls_enabled {
    use crate::config;
    use std::collections::HashMap;
    use std::error::Error;
    use std::path::Path;
    use std::sync::Arc;
    use std::{fs, io};
    use tokio_rustls::rustls::{self, ProtocolVersion, ServerConfig};
    use tokio_rustls::TlsAcceptor;

    pub type Acceptor = Arc<TlsAcceptor>;

    /// [Acceptor] cache, to avoid reading the same files several times.
    ///
    /// Two bindings with the exact same TLS block share their acceptor.
    #[derive(Default)]
    pub struct IdentityStore {
        acceptors: HashMap<config::Tls, Acceptor>,
    }

    impl IdentityStore {
        /// Retrieves the acceptor for `tls`, or get it from the cache if it has already been
        /// built.
        pub fn acceptor(&mut self, tls: &config::Tls) -> Result<Acceptor, Box<dyn Error + 'static>> {
            if let Some(acceptor) = self.acceptors.get(tls) {
                Ok(acceptor.clone())
            } else {
                let acceptor = Arc::new(build_acceptor(tls)?);
                self.acceptors.insert(tls.clone(), acceptor.clone());
                Ok(acceptor)
            }
        }
    }

    fn invalid(msg: String) -> Box<dyn Error + 'static> {
        log::error!("{}", msg);
        Box::new(io::Error::new(io::ErrorKind::InvalidData, msg))
    }

    fn read_certs(certfile: &Path) -> Result<Vec<rustls::Certificate>, Box<dyn Error + 'static>> {
        use tokio_rustls::rustls::internal::pemfile;

        log::info!("Loading TLS certificate from {:?}", certfile.display());
        let cert = fs::read(certfile).map_err(|err| {
            log::error!("Failed to read {:?}: {}", certfile.display(), err);
            err
        })?;
        let certs = pemfile::certs(&mut cert.as_ref())
            .map_err(|_| invalid(format!("Failed to parse {:?}", certfile.display())))?;
        if certs.is_empty() {
            return Err(invalid(format!("No certificate found in {:?}", certfile.display())));
        }
        Ok(certs)
    }

    fn read_key(keyfile: &Path) -> Result<rustls::PrivateKey, Box<dyn Error + 'static>> {
        use tokio_rustls::rustls::internal::pemfile;

        log::info!("Loading TLS private key from {:?}", keyfile.display());
        let key = fs::read(keyfile).map_err(|err| {
            log::error!("Failed to read {:?}: {}", keyfile.display(), err);
            err
        })?;
        let parse_err = |_| invalid(format!("Failed to parse {:?}", keyfile.display()));

        let mut keys = pemfile::pkcs8_private_keys(&mut key.as_ref()).map_err(parse_err)?;
        if keys.is_empty() {
            keys = pemfile::rsa_private_keys(&mut key.as_ref()).map_err(parse_err)?;
        }
        if keys.is_empty() {
            return Err(invalid(format!("No key found in {:?}", keyfile.display())));
        }
        Ok(keys.remove(0))
    }

    /// Reads the files named in `tls` and builds an [Acceptor] object.
    fn build_acceptor(tls: &config::Tls) -> Result<TlsAcceptor, Box<dyn Error + 'static>> {
        let mut config = ServerConfig::new(rustls::NoClientAuth::new());

        let certs = read_certs(&tls.certificate)?;
        let key = read_key(&tls.key)?;
        config.set_single_cert(certs, key).map_err(|err| {
            log::error!(
                "Failed to associate {:?} with {:?}: {}",
                tls.certificate.display(),
                tls.key.display(),
                err
            );
            err
        })?;

        if !tls.ciphers.is_empty() {
            let mut suites = Vec::with_capacity(tls.ciphers.len());
            for name in &tls.ciphers {
                let suite = rustls::ALL_CIPHERSUITES
                    .iter()
                    .find(|suite| format!("{:?}", suite.suite) == *name)
                    .ok_or_else(|| invalid(format!("Unknown cipher suite {:?}", name)))?;
                suites.push(*suite);
            }
            config.ciphersuites = suites;
        }

        if !tls.protocols.is_empty() {
            config.versions = tls.protocols
                .iter()
                .map(|protocol| match protocol.as_str() {
                    "tls1.2" => Ok(ProtocolVersion::TLSv1_2),
                    "tls1.3" => Ok(ProtocolVersion::TLSv1_3),
                    _ => Err(invalid(format!("Unknown TLS version {:?}", protocol))),
                })
                .collect::<Result<_, _>>()?;
        }

        if let Some(dhparams) = &tls.dhparams {
            log::warn!("Ignoring {:?}: only ECDHE key exchanges are supported", dhparams.display());
        }

        Ok(TlsAcceptor::from(Arc::new(config)))
    }
}

#[cfg(not(feature = "tls"))]
mod tls_disabled {
    use crate::config;
    use std::error::Error;

    /// Cannot be built: TLS bindings fail to load without the `tls` feature.
    pub enum Acceptor {}

    impl Clone for Acceptor {
        fn clone(&self) -> Self {
            match *self {}
        }
    }

    #[derive(Debug)]
    struct UnimplementedError;

    impl std::fmt::Display for UnimplementedError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "tls support disabled")
        }
    }

    impl Error for UnimplementedError {}

    #[derive(Default)]
    pub struct IdentityStore;

    impl IdentityStore {
        pub fn acceptor(&mut self, tls: &config::Tls) -> Result<Acceptor, Box<dyn Error + 'static>> {
            log::error!(
                "TLS support is disabled, cannot load cert {:?} and key {:?}",
                tls.certificate.display(),
                tls.key.display(),
            );
            Err(Box::new(UnimplementedError))
        }
    }
}
