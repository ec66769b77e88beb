//! OAuth 1.0 / 1.0a: signing primitives and the three-legged client.

pub mod client;
pub mod signer;
pub mod values;

use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode};

pub use client::{HandshakeState, OAuthClient};
pub use signer::{Secrets, SignedContent, Signer};
pub use values::{OAuthVersion, SignatureMethod};

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
const TARGETS_FOR_PARAMS: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub(crate) fn percent_encode(input: &str) -> PercentEncode<'_> {
    utf8_percent_encode(input, TARGETS_FOR_PARAMS)
}

#[test]
fn test_percent_encode() {
    assert_eq!(percent_encode("abc-._~XYZ019").to_string(), "abc-._~XYZ019");
    assert_eq!(
        percent_encode("Ladies + Gentlemen").to_string(),
        "Ladies%20%2B%20Gentlemen"
    );
    assert_eq!(percent_encode("☃").to_string(), "%E2%98%83");
}
