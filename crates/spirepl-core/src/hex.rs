//! Hex codec for transfer requests and responses
//!
//! Requests are typed by a human, so decoding is a little forgiving: a
//! leading `0x` is dropped and an odd number of digits gets a leading `0`.
//! Responses are always printed as bare lowercase hex.

use crate::error::Result;

/// Prefix stripped from requests before decoding
pub const HEX_PREFIX: &str = "0x";

/// Decode a request typed at the prompt into the bytes to send
///
/// Both upper and lower case digits are accepted. Empty input decodes to an
/// empty request.
pub fn decode_request(text: &str) -> Result<Vec<u8>> {
    let digits = text.strip_prefix(HEX_PREFIX).unwrap_or(text);

    let bytes = if digits.len() % 2 != 0 {
        ::hex::decode(format!("0{}", digits))?
    } else {
        ::hex::decode(digits)?
    };

    Ok(bytes)
}

/// Encode a response as lowercase hex without separators
pub fn encode_response(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}
