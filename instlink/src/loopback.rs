//! The loopback module provides an instrument simulator for testing purposes.

use std::{collections::VecDeque, fmt};

use crate::{InstrumentError, InstrumentInterface};

/// An interface that allows you to simply write tests for your instrument driver.
///
/// The interface is loaded with the commands expected from the host to the instrument and the
/// canned responses from the instrument to the host. Both are consumed strictly in order: every
/// command the driver sends is checked against the next expected one (a mismatch panics), and
/// every read serves bytes of the next canned response, terminator appended. Call
/// [`LoopbackInterface::finalize`] at the end of your test to ensure that no expected traffic was
/// left over.
///
/// # Example
///
/// ```
/// use instlink::{InstrumentInterface, LoopbackInterface};
///
/// let mut lbk = LoopbackInterface::new(vec!["*IDN?"], vec!["Some Instrument,1234"]);
/// assert_eq!(lbk.query("*IDN?").unwrap(), "Some Instrument,1234");
/// lbk.finalize();
/// ```
pub struct LoopbackInterface<T>
where
    T: AsRef<[u8]> + fmt::Display + PartialEq,
{
    from_host: VecDeque<T>,
    from_inst: VecDeque<T>,
    curr_bytes: VecDeque<u8>,
    terminator: String,
}

impl<T> LoopbackInterface<T>
where
    T: AsRef<[u8]> + fmt::Display + PartialEq,
{
    /// Create a new loopback instrument with given commands to and from instrument.
    ///
    /// The commands are consumed in order. Call [`LoopbackInterface::finalize`] at the end of the
    /// test in order to ensure that no commands are left in either vector.
    ///
    /// # Arguments:
    /// * `from_host` - Commands expected from host to instrument.
    /// * `from_inst` - Responses from instrument to host.
    pub fn new(from_host: Vec<T>, from_inst: Vec<T>) -> Self {
        LoopbackInterface {
            from_host: from_host.into(),
            from_inst: from_inst.into(),
            curr_bytes: VecDeque::new(),
            terminator: "\n".to_string(), // Default terminator.
        }
    }

    /// This command panics if not all commands in the `LoopbackInterface` have been used.
    ///
    /// You should use this command at the end of your test in order to make sure that all the
    /// input and output you provided have been consumed.
    pub fn finalize(&mut self) {
        if let Some(leftover) = self.from_host.pop_front() {
            panic!("Leftover expected commands found from host to instrument: {leftover}");
        }
        if let Some(leftover) = self.from_inst.pop_front() {
            panic!("Leftover expected commands found from instrument to host: {leftover}");
        }
    }

    /// Test the interface's terminator and ensure the right one is set.
    ///
    /// The correct terminator can either be the default one or the one that was set via the
    /// `set_terminator` function.
    pub fn test_terminator(&self, expected_terminator: &str) {
        assert_eq!(
            expected_terminator, self.terminator,
            "Expected terminator '{expected_terminator}', got '{}'",
            self.terminator
        );
    }

    /// Get the next command from host to instrument as a string including the terminator.
    fn next_from_host_with_terminator(&mut self) -> String {
        let cmd = self
            .from_host
            .pop_front()
            .expect("No more commands were expected from host to instrument.");
        format!("{cmd}{}", self.terminator)
    }

    /// Function to read exactly one byte from the next response from the instrument.
    ///
    /// This just panics if there are no more responses. If there are no more responses but one is
    /// required, the panic is justified as this is a test interface.
    fn read_one_byte(&mut self) -> u8 {
        match self.curr_bytes.pop_front() {
            Some(byte) => byte,
            None => {
                let resp = self
                    .from_inst
                    .pop_front()
                    .expect("No more commands were expected from instrument to host.");
                let resp = format!("{resp}{}", self.terminator);
                self.curr_bytes = resp.into_bytes().into();
                self.read_one_byte()
            }
        }
    }
}

impl<T> InstrumentInterface for LoopbackInterface<T>
where
    T: AsRef<[u8]> + fmt::Display + PartialEq,
{
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InstrumentError> {
        for byte in buf.iter_mut() {
            *byte = self.read_one_byte();
        }
        Ok(())
    }

    fn get_terminator(&self) -> &str {
        self.terminator.as_str()
    }

    fn set_terminator(&mut self, terminator: &str) {
        self.terminator = terminator.to_string();
    }

    fn write_raw(&mut self, cmd: &[u8]) -> Result<(), InstrumentError> {
        let exp = self.next_from_host_with_terminator();
        assert_eq!(
            exp.as_bytes(),
            cmd,
            "Expected sendcmd '{exp}', got '{:?}'",
            str::from_utf8(cmd)
        );
        Ok(())
    }
}
