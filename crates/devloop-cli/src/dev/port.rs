//! Free-port search.
//!
//! Probes ports upward from a starting point by binding a TCP listener on all
//! interfaces and releasing it immediately. The first port that binds wins.

use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortError {
    /// Port 0 asks the OS for any port, which defeats a sequential search.
    #[error("Cannot search for a free port starting at 0\n\nHint: Use a concrete starting port such as 3333")]
    InvalidStart,

    /// Every port from `start` through 65535 is taken.
    #[error("No free port found between {start} and 65535")]
    Exhausted { start: u16 },
}

/// Find the first port at or above `start` that can be bound on all interfaces.
///
/// # Errors
///
/// [`PortError::Exhausted`] when no port up to 65535 is free, and
/// [`PortError::InvalidStart`] for a starting port of 0.
pub fn find_free_port(start: u16) -> Result<u16, PortError> {
    if start == 0 {
        return Err(PortError::InvalidStart);
    }

    // Inclusive range: 65535 itself is a valid port.
    for port in start..=u16::MAX {
        if is_port_free(port) {
            return Ok(port);
        }
        tracing::debug!(port, "Port busy");
    }

    Err(PortError::Exhausted { start })
}

/// Check whether a listener could be bound to `port` on `0.0.0.0` right now.
pub fn is_port_free(port: u16) -> bool {
    TcpListener::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))).is_ok()
}
