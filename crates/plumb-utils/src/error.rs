/// Base error type for plumb-utils operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("date parse error: {0}")]
    DateParse(String),

    #[error("invalid identity {field} '{value}': must not contain '<', '>' or newlines")]
    InvalidIdentity { field: &'static str, value: String },

    #[error("signature parse error: {0}")]
    SignatureParse(String),
}
