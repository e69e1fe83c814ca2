//! Data logging for the Keysight 53220A counter.
//!
//! This crate holds the pieces of the `counterlog` binary that are worth reusing from a host
//! application: the CSV [`LogSink`] with its sequential file naming and UTC-midnight rollover,
//! the fixed-rate [`Poller`], and the [`StopToken`] that stops the polling loop deterministically.
//!
//! The flow of the binary itself is strictly sequential: connect, configure from a saved state
//! file, arm, then poll once per second and append every non-empty reading to the log until the
//! token is cancelled or a transport error ends the session.

#![warn(missing_docs)]

mod logfile;
mod poller;
mod stop;

pub use logfile::{LOG_HEADER, LogSink, next_log_path};
pub use poller::Poller;
pub use stop::StopToken;

use thiserror::Error;

use instlink::InstrumentError;

/// The error enum for the logging application.
///
/// Every failure here is terminal for the logging session: there is no recovery tier for a
/// manually supervised bench tool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoggerError {
    /// Communication with the counter failed. See [`InstrumentError`] for details.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),
    /// Writing the log file or creating the log directory failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
