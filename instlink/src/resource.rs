//! Parsing of VISA-style resource strings for TCP/IP connected instruments.
//!
//! Bench instruments on a network are conventionally addressed with a resource string such as
//! `TCPIP0::192.168.23.5::inst0::INSTR`. This module parses such a string into a host and a TCP
//! port that the rest of the library can connect to directly.

use std::fmt;

use crate::InstrumentError;

/// The default port for raw SCPI socket communication.
///
/// Instruments addressed with the `instN::INSTR` form do not carry a port; they are reached via
/// the standard SCPI socket server of the instrument instead.
const SCPI_RAW_SOCKET_PORT: u16 = 5025;

/// A parsed TCP/IP VISA resource.
///
/// Two resource forms are accepted:
/// - `TCPIP<n>::<host>::inst<n>::INSTR` - the instrument form; the port defaults to 5025, the
///   standard SCPI raw socket.
/// - `TCPIP<n>::<host>::<port>::SOCKET` - the raw socket form with an explicit port.
///
/// The board index (`TCPIP0`) and the logical unit (`inst0`) are accepted and ignored, as there is
/// only a single way to reach the instrument over a plain TCP stream.
///
/// # Example
///
/// ```
/// use instlink::VisaResource;
///
/// let resource = VisaResource::parse("TCPIP0::192.168.23.5::inst0::INSTR").unwrap();
/// assert_eq!(resource.host(), "192.168.23.5");
/// assert_eq!(resource.port(), 5025);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisaResource {
    host: String,
    port: u16,
}

impl VisaResource {
    /// Parse a resource string into a [`VisaResource`].
    ///
    /// Returns [`InstrumentError::InvalidResource`] containing the rejected string if the resource
    /// is not one of the accepted TCP/IP forms.
    ///
    /// # Arguments
    /// * `resource` - The resource string, e.g., `"TCPIP0::192.168.23.5::inst0::INSTR"`.
    pub fn parse(resource: &str) -> Result<Self, InstrumentError> {
        let invalid = || InstrumentError::InvalidResource(resource.to_string());

        let parts: Vec<&str> = resource.split("::").collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(invalid());
        }

        let board = parts[0];
        let suffix = board.strip_prefix("TCPIP").ok_or_else(invalid)?;
        if !suffix.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let host = parts[1];
        if host.is_empty() {
            return Err(invalid());
        }

        let class = *parts.last().expect("parts cannot be empty after split");
        let port = match (class, parts.len()) {
            ("INSTR", 3) => SCPI_RAW_SOCKET_PORT,
            ("INSTR", 4) => {
                // Logical unit, e.g. `inst0`. Accepted but not interpreted.
                let unit = parts[2];
                let idx = unit.strip_prefix("inst").ok_or_else(invalid)?;
                if !idx.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                SCPI_RAW_SOCKET_PORT
            }
            ("SOCKET", 4) => parts[2].parse::<u16>().map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };

        Ok(VisaResource {
            host: host.to_string(),
            port,
        })
    }

    /// Get the host part of the resource.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the TCP port the instrument is reached on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the socket address of the resource as a `"host:port"` string.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for VisaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}
