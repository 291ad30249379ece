//! Errors of the fe2o3-amqp adapter

use fe2o3_amqp::link::{DispositionError, RecvError, SendError};

/// Boxed error of a setup or shutdown step
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while talking to the broker
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection address could not be parsed
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    /// The connection address has no host
    #[error("Address has no host")]
    MissingHost,

    /// The connection address has no entity path
    #[error("Address has no entity path")]
    MissingEntity,

    /// The scheme is neither `amqp` nor `amqps`
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// The percent-decoded credentials are not UTF-8
    #[error("Credentials are not valid UTF-8: {0}")]
    Credentials(#[from] std::string::FromUtf8Error),

    /// Connecting, beginning the session or attaching a link failed
    #[error("{step} failed: {source}")]
    Setup {
        /// Step that failed
        step: &'static str,

        /// Error returned by the client
        #[source]
        source: BoxError,
    },

    /// Detaching, ending the session or closing the connection failed
    #[error("{step} failed: {source}")]
    Shutdown {
        /// Step that failed
        step: &'static str,

        /// Error returned by the client
        #[source]
        source: BoxError,
    },

    /// Error sending a message
    #[error(transparent)]
    Send(#[from] SendError),

    /// Error receiving a message
    #[error(transparent)]
    Recv(#[from] RecvError),

    /// Error settling a received message
    #[error(transparent)]
    Disposition(#[from] DispositionError),

    /// Error of the transport-agnostic layer
    #[error(transparent)]
    Delivery(#[from] servicebus_delivery::Error),

    /// The outcome of a delivery can no longer be observed
    #[error("Delivery outcome was lost, the link or session is gone")]
    DeliveryLost,

    /// Reading the console failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn setup<E>(step: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Setup {
            step,
            source: Box::new(source),
        }
    }

    pub(crate) fn shutdown<E>(step: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Shutdown {
            step,
            source: Box::new(source),
        }
    }
}

/// A specialized `Result` type for the adapter
pub type Result<T> = std::result::Result<T, Error>;
