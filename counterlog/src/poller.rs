//! The fixed-rate polling loop.

use std::{thread, time::Duration};

use instlink::InstrumentInterface;
use keysight_53220a::{DataFormat, Keysight53220a};

use crate::{LogSink, LoggerError, StopToken};

/// Polls the counter's result buffer at a fixed rate and feeds the log sink.
///
/// The rate is not adaptive and there is no drift correction: every cycle sleeps the full
/// interval, then fetches at most one buffered reading. Any transport error ends the loop and
/// propagates to the caller; a single failed query ends the logging session.
pub struct Poller {
    interval: Duration,
}

impl Poller {
    /// Create a new poller with the given polling interval.
    ///
    /// # Arguments
    /// * `interval` - Time slept before each poll.
    pub fn new(interval: Duration) -> Self {
        Poller { interval }
    }

    /// Run the polling loop until the stop token is cancelled.
    ///
    /// The result transfer format is set to ASCII once, then each cycle sleeps the interval and
    /// performs one [`Poller::poll_once`]. The token is checked again after the sleep so no
    /// further command is sent to the instrument once cancelled.
    ///
    /// # Arguments
    /// * `inst` - The counter to poll.
    /// * `sink` - The log sink records are appended to.
    /// * `stop` - Cancellation token, see [`StopToken`].
    pub fn run<T: InstrumentInterface>(
        &self,
        inst: &mut Keysight53220a<T>,
        sink: &mut LogSink,
        stop: &StopToken,
    ) -> Result<(), LoggerError> {
        inst.set_data_format(DataFormat::Ascii)?;

        while !stop.is_cancelled() {
            thread::sleep(self.interval);
            if stop.is_cancelled() {
                break;
            }
            self.poll_once(inst, sink)?;
        }
        Ok(())
    }

    /// Perform one polling cycle without the sleep.
    ///
    /// Reads one buffered result. A non-empty reading is echoed to stdout and appended to the
    /// sink; an empty reading means the instrument had nothing new and the cycle is skipped.
    /// Returns whether a record was written.
    ///
    /// # Arguments
    /// * `inst` - The counter to poll.
    /// * `sink` - The log sink records are appended to.
    pub fn poll_once<T: InstrumentInterface>(
        &self,
        inst: &mut Keysight53220a<T>,
        sink: &mut LogSink,
    ) -> Result<bool, LoggerError> {
        let reading = inst.read_buffered(1)?;
        if reading.is_empty() {
            return Ok(false);
        }

        println!("{reading}");
        sink.append(&reading)?;
        Ok(true)
    }
}
