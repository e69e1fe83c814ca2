//! Unwrapping of IEEE 488.2 definite-length block responses.
//!
//! The 53220A returns buffered results from `:R?` wrapped in a length-prefixed block of the form
//! `#<d><len><payload>`, where `<d>` is the number of digits of `<len>` and `<len>` is the payload
//! length in bytes. An empty buffer is reported as `#10`.

use instlink::InstrumentError;

/// Strip the length-prefix wrapper from a block response and return the bare payload.
///
/// An indefinite-length block (`#0...`) yields everything after the prefix, trailing whitespace
/// trimmed. Anything that is not a well-formed block is a
/// [`InstrumentError::ResponseParse`] error carrying the full response.
pub(crate) fn strip_block_header(resp: &str) -> Result<String, InstrumentError> {
    let parse_err = || InstrumentError::ResponseParse(resp.to_string());

    // Block responses are ASCII by protocol; this also keeps the byte indexing below safe.
    if !resp.is_ascii() {
        return Err(parse_err());
    }

    let rest = resp.strip_prefix('#').ok_or_else(parse_err)?;
    let mut chars = rest.chars();
    let ndigits = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(parse_err)? as usize;
    let rest = chars.as_str();

    if ndigits == 0 {
        // Indefinite-length block, payload runs until the end of the response.
        return Ok(rest.trim_end().to_string());
    }

    if rest.len() < ndigits {
        return Err(parse_err());
    }
    let (len_str, payload) = rest.split_at(ndigits);
    let len: usize = len_str.parse().map_err(|_| parse_err())?;

    if payload.len() < len {
        return Err(parse_err());
    }
    Ok(payload[..len].to_string())
}
