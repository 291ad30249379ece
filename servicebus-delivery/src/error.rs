//! Errors of the transport-agnostic layer

/// Errors that are not tied to a particular transport
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The OS entropy source could not provide the bytes of an identifier
    #[error("Identifier generation failed: {0}")]
    GenerationFailed(#[from] getrandom::Error),

    /// The program was started with the wrong number of arguments
    #[error("Usage: {program} {usage}")]
    Usage {
        /// Name the program was invoked with
        program: String,

        /// Expected positional arguments
        usage: &'static str,
    },
}

/// A specialized `Result` type for this crate
pub type Result<T> = std::result::Result<T, Error>;
