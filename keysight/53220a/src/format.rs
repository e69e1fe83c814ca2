//! Result transfer formats of the 53220A.

use std::fmt;

/// The result transfer format used when reading measurements from the instrument.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// ASCII transfer, one reading as a signed scientific-notation string.
    #[default]
    Ascii,
    /// IEEE 754 64-bit binary transfer.
    Real,
}

impl DataFormat {
    /// The format name as it appears in the `:FORMat:DATA` command.
    pub fn to_cmd_str(self) -> &'static str {
        match self {
            DataFormat::Ascii => "ASC",
            DataFormat::Real => "REAL",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cmd_str())
    }
}
