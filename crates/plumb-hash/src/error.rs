/// Errors from parsing object names and computing digests.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("bad object name: '{character}' at offset {position} is not a hex digit")]
    InvalidHex { position: usize, character: char },

    #[error("bad object name: {actual} hex digits, need {expected}")]
    InvalidHexLength { expected: usize, actual: usize },

    #[error("raw object id must be {expected} bytes, got {actual}")]
    InvalidHashLength { expected: usize, actual: usize },

    /// The input carries a known SHA-1 collision attack pattern.
    #[error("SHA-1 collision attack detected")]
    Sha1Collision,
}
