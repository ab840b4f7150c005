//! Listening sockets: command line addresses and inherited descriptors.
//!
//! - `systemd` - Sockets passed by the service manager

pub mod systemd;

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    static ref LISTEN_ADDRESS: Regex = Regex::new(
        r"^(?:(?P<socket>.*/.*)|(?:(?:\[(?P<ipv6>.*)\]|(?P<host>.*)):(?P<port>\d+)))$"
    )
    .expect("valid regex");
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid listen address '{0}': expected HOST:PORT, [IPV6]:PORT or a socket path")]
pub struct AddressError(String);

/// An address given with `--listen`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddress {
    Tcp { host: String, port: u16 },
    Unix(PathBuf),
}

impl ListenAddress {
    /// Host to bind; an empty host binds every interface.
    pub fn bind_host(host: &str) -> &str {
        if host.is_empty() {
            "0.0.0.0"
        } else {
            host
        }
    }
}

impl FromStr for ListenAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = LISTEN_ADDRESS
            .captures(s)
            .ok_or_else(|| AddressError(s.to_string()))?;

        if let Some(port) = captures.name("port") {
            let port = port
                .as_str()
                .parse::<u16>()
                .map_err(|_| AddressError(s.to_string()))?;
            let host = captures
                .name("ipv6")
                .or_else(|| captures.name("host"))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            return Ok(ListenAddress::Tcp { host, port });
        }

        match captures.name("socket") {
            Some(path) => Ok(ListenAddress::Unix(PathBuf::from(path.as_str()))),
            None => Err(AddressError(s.to_string())),
        }
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenAddress::Tcp { host, port } if host.contains(':') => {
                write!(f, "[{}]:{}", host, port)
            }
            ListenAddress::Tcp { host, port } => write!(f, "{}:{}", host, port),
            ListenAddress::Unix(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Where the server accepts connections.
#[derive(Debug)]
pub enum ListenSocket {
    /// Bound by the server at startup.
    Address(ListenAddress),
    /// Already listening, inherited from the service manager.
    Tcp(std::net::TcpListener),
    Unix(UnixListener),
}
