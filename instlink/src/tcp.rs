//! This module provides the implementation for an instrument controlled via TCP/IP.
//!
//! It includes a blocking implementation of the [`crate::InstrumentInterface`] trait using the
//! [`std::net::TcpStream`] struct.

use std::{
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use crate::{Instrument, InstrumentError, VisaResource};

/// A blocking TCP/IP interface using the [`std::net::TcpStream`] struct.
///
/// The session to the instrument is owned by the returned [`Instrument`] and is closed exactly
/// once, when that value is dropped.
#[derive(Debug)]
pub struct TcpInterface {}

impl TcpInterface {
    /// Try to create a new TCP/IP instrument interface from a socket address.
    ///
    /// The terminator is by default set to `"\n"`, but can be changed using the `set_terminator`
    /// function. Note that the terminator is automatically appended to commands and reading
    /// responses will read until the terminator is found.
    ///
    /// Read and write timeouts of three seconds are set on the stream. We do not want to
    /// infinitely block on a non-responding instrument, especially as all communication is
    /// blocking.
    ///
    /// # Arguments
    /// * `sock_addr` - Socket address.
    pub fn try_new<A: ToSocketAddrs>(
        sock_addr: A,
    ) -> Result<Instrument<TcpStream>, InstrumentError> {
        let stream = TcpStream::connect(sock_addr)?;
        let timeout = Duration::from_secs(3);
        stream.set_write_timeout(Some(timeout))?;
        stream.set_read_timeout(Some(timeout))?;
        Ok(Instrument::new(stream, timeout))
    }

    /// Open an instrument addressed by a parsed VISA resource.
    ///
    /// This behaves like [`TcpInterface::try_new`], however, a failure to connect is reported as
    /// [`InstrumentError::Connection`] naming the unreachable host. The underlying I/O error is
    /// kept as the source of the returned error.
    ///
    /// # Arguments
    /// * `resource` - The parsed resource, see [`VisaResource::parse`].
    pub fn open_resource(
        resource: &VisaResource,
    ) -> Result<Instrument<TcpStream>, InstrumentError> {
        Self::try_new(resource.socket_addr()).map_err(|err| match err {
            InstrumentError::Io(source) => InstrumentError::Connection {
                host: resource.host().to_string(),
                source,
            },
            other => other,
        })
    }
}
