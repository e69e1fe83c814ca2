//! Instlink: talk to your SCPI-style bench equipment from Rust.
//!
//! This library provides a standardized interface to communicate with bench instruments over a
//! network socket. To do so, it provides an [`InstrumentInterface`] trait with blocking send and
//! query routines, a generic [`Instrument`] wrapper that implements the trait for any byte stream,
//! and a [`TcpInterface`] to open instruments that are addressed by a VISA-style resource string
//! such as `TCPIP0::192.168.23.5::inst0::INSTR`.
//!
//! Instrument drivers should be generic over the [`InstrumentInterface`] trait and return
//! [`InstrumentError`] from all fallible routines. This way, a driver can be tested against the
//! provided [`LoopbackInterface`] instrument simulator without any hardware present.
//!
//! # Example
//!
//! ```no_run
//! use instlink::{InstrumentInterface, TcpInterface, VisaResource};
//!
//! let resource = VisaResource::parse("TCPIP0::192.168.23.5::inst0::INSTR").unwrap();
//! let mut inst = TcpInterface::open_resource(&resource).unwrap();
//! println!("{}", inst.query("*IDN?").unwrap());
//! ```
//!
//! # License
//!
//! Licensed under either of
//!
//! - Apache License, Version 2.0 ([LICENSE-APACHE](http://www.apache.org/licenses/LICENSE-2.0))
//! - MIT license ([LICENSE-MIT](http://opensource.org/licenses/MIT))
//!
//! at your option.

#![warn(missing_docs)]

mod instrument;
mod loopback;
mod resource;
mod tcp;

pub use instrument::Instrument;
pub use loopback::LoopbackInterface;
pub use resource::VisaResource;
pub use tcp::TcpInterface;

use std::time::{Duration, Instant};

use thiserror::Error;

/// The error enum for all instrument communication.
///
/// For any command sending or querying, your instrument driver should return either an empty
/// result or a result with the query where this error is the alternative. `InstrumentError` makes
/// it easy to propagate command and query errors forward with the `?` operator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstrumentError {
    /// The instrument could not be reached at the given host. The underlying I/O error is kept as
    /// the source of this error and is displayed along with the host name.
    #[error("Cannot connect to instrument at host {host}: {source}")]
    Connection {
        /// Host part of the resource that could not be reached.
        host: String,
        /// The underlying I/O error that caused the connection to fail.
        source: std::io::Error,
    },
    /// The given resource string could not be parsed. The error contains the resource string that
    /// was rejected.
    #[error("Invalid VISA resource string: {0}")]
    InvalidResource(String),
    /// Error when reading from/writing to an interface. See [`std::io::Error`] for more details.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Instrument response could not be parsed because it was unexpected by the driver. This error
    /// contains the response that was received from the instrument.
    #[error("Response from instrument could not be parsed. Response was: {0}")]
    ResponseParse(String),
    /// Timeout occurred while waiting for a response from the instrument. The error contains the
    /// timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response from the instrument. Timeout was set to {0:?}."
    )]
    Timeout(Duration),
    /// Timeout occurred while waiting for a response to a query. The error contains the query
    /// that was sent and the timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response to query: {query}. Timeout was set to {timeout:?}."
    )]
    TimeoutQuery {
        /// The query that timed out.
        query: String,
        /// The timeout that was set.
        timeout: Duration,
    },
}

/// The `InstrumentInterface` trait defines the interface for controlling instruments.
///
/// Implementors only need to provide [`InstrumentInterface::read_exact`] and
/// [`InstrumentInterface::write_raw`]; sending terminated commands and querying responses are
/// provided on top of these. All routines are blocking.
pub trait InstrumentInterface {
    /// Read exactly enough bytes from the instrument to fill the given buffer.
    ///
    /// # Arguments:
    /// - `buf` - The buffer to fill.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InstrumentError>;

    /// Write raw bytes to the instrument and flush the interface.
    ///
    /// # Arguments:
    /// - `data` - The bytes to write.
    fn write_raw(&mut self, data: &[u8]) -> Result<(), InstrumentError>;

    /// Get the terminator of the interface. Defaults to `"\n"`.
    fn get_terminator(&self) -> &str {
        "\n"
    }

    /// Set the terminator of an interface from a `&str`.
    ///
    /// # Arguments:
    /// - `_terminator` - A string slice that will be used as the terminator for commands.
    fn set_terminator(&mut self, _terminator: &str) {}

    /// Get the timeout for reading a response. Defaults to three seconds.
    fn get_timeout(&self) -> Duration {
        Duration::from_secs(3)
    }

    /// Send a command to the instrument.
    ///
    /// This function takes the command, appends the terminator, and writes it to the instrument.
    /// The interface is flushed to ensure that the command is sent immediately.
    ///
    /// # Arguments:
    /// - `cmd` - A string slice that will be sent to the instrument.
    fn sendcmd(&mut self, cmd: &str) -> Result<(), InstrumentError> {
        let full_cmd = format!("{cmd}{}", self.get_terminator());
        self.write_raw(full_cmd.as_bytes())
    }

    /// Query the instrument with a command and return the response as a String.
    ///
    /// This function uses `sendcmd` to send the command and then reads the response until the
    /// terminator is found. If no terminator is encountered within the timeout, a
    /// [`InstrumentError::TimeoutQuery`] naming the query is returned.
    ///
    /// # Arguments:
    /// - `cmd` - The command to send to the instrument for which we expect a response.
    fn query(&mut self, cmd: &str) -> Result<String, InstrumentError> {
        self.sendcmd(cmd)?;
        self.read_until_terminator().map_err(|err| match err {
            InstrumentError::Timeout(timeout) => InstrumentError::TimeoutQuery {
                query: cmd.to_string(),
                timeout,
            },
            other => other,
        })
    }

    /// Read from the instrument until the terminator is found and return the trimmed response.
    ///
    /// The response is read character by character until it ends with the terminator. If a
    /// non-UTF-8 byte is received, an error is printed to stderr and the byte is skipped. If no
    /// terminator is encountered, the function returns [`InstrumentError::Timeout`] once the
    /// timeout is reached.
    fn read_until_terminator(&mut self) -> Result<String, InstrumentError> {
        let terminator = self.get_terminator().to_string();
        let mut response = String::new();
        let mut single_buf = [0u8];

        let tic = Instant::now();
        let mut timeout_occured = true;

        while (Instant::now() - tic) < self.get_timeout() {
            self.read_exact(&mut single_buf)?;
            if let Ok(val) = str::from_utf8(&single_buf) {
                response.push_str(val);
            } else {
                eprintln!("Received invalid UTF-8 data: {single_buf:?}");
            }
            if response.ends_with(&terminator) {
                timeout_occured = false;
                break;
            }
        }

        if timeout_occured {
            Err(InstrumentError::Timeout(self.get_timeout()))
        } else {
            Ok(response.trim().to_string())
        }
    }
}
