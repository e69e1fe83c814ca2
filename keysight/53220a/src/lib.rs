//! A rust driver for the Keysight 53220A frequency/time-interval counter.
//!
//! This driver provides the functionality needed to run the counter from a previously saved
//! instrument state: identification, status clearing and reset, loading a state file from the
//! instrument's own storage, arming a measurement, and reading buffered results one at a time.
//!
//! # Example
//!
//! This example connects over the network, loads a saved state, and reads one result.
//! ```no_run
//! use instlink::{TcpInterface, VisaResource};
//! use keysight_53220a::Keysight53220a;
//!
//! let resource = VisaResource::parse("TCPIP0::192.168.23.5::inst0::INSTR").unwrap();
//! let interface = TcpInterface::open_resource(&resource).unwrap();
//! let mut inst = Keysight53220a::try_new(interface).unwrap();
//!
//! // Query the name of the instrument
//! println!("{}", inst.get_name().unwrap());
//!
//! // Configure from a state file on the instrument and arm the measurement.
//! inst.apply_state("INT:\\RAT.EXTRIG.10sec.sta").unwrap();
//! inst.initiate().unwrap();
//!
//! // Read a single buffered result, empty if nothing has completed yet.
//! println!("{}", inst.read_buffered(1).unwrap());
//! ```

#![deny(warnings, missing_docs)]

mod block;
mod format;

pub use format::DataFormat;

use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use instlink::{InstrumentError, InstrumentInterface};

/// The settle delay between the configuration steps of [`Keysight53220a::apply_state`].
const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

/// A rust driver for the Keysight 53220A.
///
/// The driver assumes the measurement itself is fully described by a state file saved on the
/// instrument; it only loads, arms, and reads out. See the top-level documentation for an example
/// on how to use this driver.
pub struct Keysight53220a<T: InstrumentInterface> {
    interface: Arc<Mutex<T>>,
    settle: Duration,
}

impl<T: InstrumentInterface> Keysight53220a<T> {
    /// Create a new Keysight53220a instance with the given instrument interface.
    ///
    /// # Arguments
    /// * `interface` - An instrument interface that implements the [`InstrumentInterface`] trait.
    pub fn try_new(interface: T) -> Result<Self, InstrumentError> {
        let interface = Arc::new(Mutex::new(interface));

        Ok(Keysight53220a {
            interface,
            settle: DEFAULT_SETTLE,
        })
    }

    /// Query the name of the instrument.
    ///
    /// Returns a comma-separated string of:
    /// * Manufacturer ID
    /// * Model number
    /// * Instrument serial number
    /// * Firmware version
    pub fn get_name(&mut self) -> Result<String, InstrumentError> {
        self.query("*IDN?")
    }

    /// Clear the instrument's status registers and error queue.
    pub fn clear_status(&mut self) -> Result<(), InstrumentError> {
        self.sendcmd("*CLS")
    }

    /// Reset the instrument to its power-on configuration.
    pub fn reset(&mut self) -> Result<(), InstrumentError> {
        self.sendcmd("*RST")
    }

    /// Load a previously saved state file from the instrument's own storage.
    ///
    /// The path lives on the instrument's file system (drive-letter style, e.g.
    /// `INT:\RAT.EXTRIG.10sec.sta`) and is sent to the instrument as-is, without validation.
    ///
    /// # Arguments
    /// * `state_file` - Path of the state file on the instrument.
    pub fn load_state(&mut self, state_file: &str) -> Result<(), InstrumentError> {
        self.sendcmd(&format!(":MMEMory:LOAD:STATe \"{state_file}\""))
    }

    /// Arm the measurement described by the current configuration.
    ///
    /// Once armed, the instrument starts buffering completed results internally; they are
    /// retrieved with [`Keysight53220a::read_buffered`].
    pub fn initiate(&mut self) -> Result<(), InstrumentError> {
        self.sendcmd(":INITiate:IMMediate")
    }

    /// Set the result transfer format.
    ///
    /// # Arguments
    /// * `format` - The transfer format, see [`DataFormat`].
    pub fn set_data_format(&mut self, format: DataFormat) -> Result<(), InstrumentError> {
        self.sendcmd(&format!(":FORMat:DATA {}", format.to_cmd_str()))
    }

    /// Configure the instrument from a saved state file.
    ///
    /// Sends, in strict order with the settle delay between the first three steps: `*CLS`, `*RST`,
    /// and the state load. The instrument needs the delay to finish processing the clear and the
    /// reset before the next command. No read-back verification is performed; success is assumed
    /// if no transport error occurs.
    ///
    /// Arming is a separate step, call [`Keysight53220a::initiate`] afterwards.
    ///
    /// # Arguments
    /// * `state_file` - Path of the state file on the instrument.
    pub fn apply_state(&mut self, state_file: &str) -> Result<(), InstrumentError> {
        self.clear_status()?;
        thread::sleep(self.settle);
        self.reset()?;
        thread::sleep(self.settle);
        self.load_state(state_file)
    }

    /// Read up to `n` buffered results and return them as a bare string.
    ///
    /// The instrument wraps the response of `:R?` in a definite-length block; the wrapper is
    /// stripped here. An empty string means the buffer held nothing new, which is not an error.
    ///
    /// # Arguments
    /// * `n` - Maximum number of buffered readings to fetch.
    pub fn read_buffered(&mut self, n: usize) -> Result<String, InstrumentError> {
        let resp = self.query(&format!(":R? {n}"))?;
        block::strip_block_header(&resp)
    }

    /// Set the settle delay used between the steps of [`Keysight53220a::apply_state`].
    ///
    /// The default of one second is what the instrument needs after `*CLS` and `*RST`; shorter
    /// values are mainly useful for simulated instruments.
    pub fn set_settle_time(&mut self, settle: Duration) {
        self.settle = settle;
    }

    /// Send a command to the instrument.
    fn sendcmd(&mut self, cmd: &str) -> Result<(), InstrumentError> {
        let mut intf = self.interface.lock().expect("Mutex should not be poisoned");
        intf.sendcmd(cmd)
    }

    /// Query the instrument with a command and return the response as a String.
    fn query(&mut self, cmd: &str) -> Result<String, InstrumentError> {
        let mut intf = self.interface.lock().expect("Mutex should not be poisoned");
        intf.query(cmd)
    }
}

impl<T: InstrumentInterface> Clone for Keysight53220a<T> {
    fn clone(&self) -> Self {
        Self {
            interface: self.interface.clone(),
            settle: self.settle,
        }
    }
}
