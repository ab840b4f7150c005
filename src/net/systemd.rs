//! systemd socket activation.
//!
//! The service manager passes listening sockets as descriptors starting at 3
//! and announces them through `LISTEN_PID` and `LISTEN_FDS`.

use nix::fcntl::{fcntl, FcntlArg, FdFlag};
use nix::sys::socket::{getsockname, getsockopt, sockopt, AddressFamily, SockType, SockaddrLike, SockaddrStorage};
use std::env;
use std::os::fd::{BorrowedFd, FromRawFd, RawFd};
use std::os::unix::net::UnixListener;
use std::path::Path;
use thiserror::Error;

use super::ListenSocket;

pub const LISTEN_FDS_START: RawFd = 3;

#[derive(Debug, Error)]
pub enum SystemdError {
    #[error("systemd not running")]
    NotBooted,
    #[error("no sockets received from systemd")]
    NoSockets,
    #[error("invalid {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error(
        "fd {0}: socket family must be AF_INET, AF_INET6, or AF_UNIX; \
         socket type must be SOCK_STREAM; and it must be listening"
    )]
    UnsupportedSocket(RawFd),
    #[error("failed to inspect fd {fd}: {source}")]
    Inspect {
        fd: RawFd,
        #[source]
        source: nix::Error,
    },
}

/// Whether the host was booted with systemd as init.
pub fn booted() -> bool {
    Path::new("/run/systemd/system").is_dir()
}

/// Descriptors announced for `own_pid`, given the raw environment values.
pub fn parse_listen_fds(
    listen_pid: Option<&str>,
    listen_fds: Option<&str>,
    own_pid: u32,
) -> Result<Vec<RawFd>, SystemdError> {
    let (Some(listen_pid), Some(listen_fds)) = (listen_pid, listen_fds) else {
        return Ok(Vec::new());
    };

    let pid: u32 = listen_pid.trim().parse().map_err(|_| SystemdError::InvalidEnv {
        name: "LISTEN_PID",
        value: listen_pid.to_string(),
    })?;
    if pid != own_pid {
        log::debug!("LISTEN_PID {} is not ours ({})", pid, own_pid);
        return Ok(Vec::new());
    }

    let count: RawFd = listen_fds
        .trim()
        .parse()
        .ok()
        .filter(|count| *count >= 0)
        .ok_or_else(|| SystemdError::InvalidEnv {
            name: "LISTEN_FDS",
            value: listen_fds.to_string(),
        })?;

    Ok((LISTEN_FDS_START..LISTEN_FDS_START + count).collect())
}

/// Descriptors passed to this process. The variables are removed so child
/// processes do not pick them up.
pub fn listen_fds() -> Result<Vec<RawFd>, SystemdError> {
    let listen_pid = env::var("LISTEN_PID").ok();
    let listen_fds = env::var("LISTEN_FDS").ok();
    env::remove_var("LISTEN_PID");
    env::remove_var("LISTEN_FDS");
    env::remove_var("LISTEN_FDNAMES");

    parse_listen_fds(
        listen_pid.as_deref(),
        listen_fds.as_deref(),
        std::process::id(),
    )
}

/// Take ownership of one inherited descriptor.
fn adopt(fd: RawFd) -> Result<ListenSocket, SystemdError> {
    let inspect = |source| SystemdError::Inspect { fd, source };

    // SAFETY: the service manager hands these descriptors to this process and
    // nothing else in it has touched them yet.
    let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
    let sock_type = getsockopt(&borrowed, sockopt::SockType).map_err(inspect)?;
    let listening = getsockopt(&borrowed, sockopt::AcceptConn).map_err(inspect)?;
    if sock_type != SockType::Stream || !listening {
        return Err(SystemdError::UnsupportedSocket(fd));
    }

    let address: SockaddrStorage = getsockname(fd).map_err(inspect)?;
    let family = address.family();

    // the typesetter must not inherit our sockets
    fcntl(fd, FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC)).map_err(inspect)?;

    match family {
        Some(AddressFamily::Inet) | Some(AddressFamily::Inet6) => {
            // SAFETY: checked above to be a listening stream socket we own.
            let listener = unsafe { std::net::TcpListener::from_raw_fd(fd) };
            Ok(ListenSocket::Tcp(listener))
        }
        Some(AddressFamily::Unix) => {
            // SAFETY: checked above to be a listening stream socket we own.
            let listener = unsafe { UnixListener::from_raw_fd(fd) };
            Ok(ListenSocket::Unix(listener))
        }
        _ => Err(SystemdError::UnsupportedSocket(fd)),
    }
}

/// All listening sockets received from systemd.
pub fn listen_sockets() -> Result<Vec<ListenSocket>, SystemdError> {
    if !booted() {
        return Err(SystemdError::NotBooted);
    }
    let sockets = listen_fds()?
        .into_iter()
        .map(adopt)
        .collect::<Result<Vec<_>, _>>()?;
    if sockets.is_empty() {
        return Err(SystemdError::NoSockets);
    }
    log::info!("Received {} socket(s) from systemd", sockets.len());
    Ok(sockets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_environment_means_no_sockets() {
        assert_eq!(parse_listen_fds(None, None, 42).unwrap(), Vec::<RawFd>::new());
        assert_eq!(parse_listen_fds(Some("42"), None, 42).unwrap(), Vec::<RawFd>::new());
    }

    #[test]
    fn test_fds_start_at_three() {
        assert_eq!(parse_listen_fds(Some("42"), Some("2"), 42).unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_other_pid_is_ignored() {
        assert!(parse_listen_fds(Some("41"), Some("2"), 42).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            parse_listen_fds(Some("pid"), Some("2"), 42),
            Err(SystemdError::InvalidEnv { name: "LISTEN_PID", .. })
        ));
        assert!(matches!(
            parse_listen_fds(Some("42"), Some("-1"), 42),
            Err(SystemdError::InvalidEnv { name: "LISTEN_FDS", .. })
        ));
    }

    #[test]
    fn test_adopt_rejects_datagram_socket() {
        use std::os::fd::AsRawFd;

        let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        assert!(matches!(
            adopt(socket.as_raw_fd()),
            Err(SystemdError::UnsupportedSocket(_))
        ));
    }

    #[test]
    fn test_adopt_accepts_listening_tcp_socket() {
        use std::os::fd::IntoRawFd;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        match adopt(listener.into_raw_fd()) {
            Ok(ListenSocket::Tcp(adopted)) => assert_eq!(adopted.local_addr().unwrap(), address),
            other => panic!("expected tcp listener, got {:?}", other),
        }
    }
}
