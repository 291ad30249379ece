#![deny(missing_docs, missing_debug_implementations)]

//! Service Bus and Event Hubs samples over [`fe2o3_amqp`]
//!
//! [`Fe2o3Session`] implements the transport traits of [`servicebus_delivery`] so that the
//! delivery tracker can drive it; [`Fe2o3Receiver`] is the receiving counterpart used by the
//! `receiver` program.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub mod convert;
pub mod endpoint;
pub mod error;
pub mod inspect;
pub mod receiver;
pub mod session;

pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use inspect::ReceivedSummary;
pub use receiver::{receiver_config, Fe2o3Receiver};
pub use session::{transport_config, DeliveryHandle, Fe2o3Session, KEY_ENCODING};

/// Installs the global `tracing` subscriber used by the sample programs
pub fn init_tracing() -> std::result::Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
