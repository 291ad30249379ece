#![deny(missing_docs, missing_debug_implementations)]

//! Transport-agnostic building blocks of the Service Bus AMQP 1.0 samples
//!
//! This crate owns everything the samples do on top of the AMQP client: addressing a namespace
//! entity, building the demonstration messages, and deciding what happened to a message once it
//! has been handed to the transport. The transport itself is reached only through the traits in
//! [`transport`], so the delivery policy in [`tracker`] can be driven by any AMQP 1.0 client (or
//! by a scripted fake in tests).
//!
//! # Delivery tracking
//!
//! ```rust,ignore
//! let tracker = DeliveryTracker::new(config.delivery_mode);
//! let report = tracker.send_and_track(&mut transport, &message).await;
//! println!("Final send status is: {}", report.outcome);
//! ```

pub mod address;
pub mod args;
pub mod config;
pub mod constants;
pub mod error;
pub mod identifier;
pub mod key;
pub mod message;
pub mod status;
pub mod tracker;
pub mod transport;

pub use address::build_address;
pub use args::{ConsoleLine, SampleArgs};
pub use config::{DeliveryMode, ReceiverSettleMode, SenderSettleMode, TransportConfig};
pub use error::{Error, Result};
pub use identifier::Identifier;
pub use key::{encode_key, KeyEncoding};
pub use message::{
    BodyKind, ListItem, MessageFactory, MessageId, OutboundMessage, Payload, PropertyValue,
};
pub use status::{DeliveryOutcome, DeliveryStatus};
pub use tracker::{DeliveryTracker, TrackReport};
pub use transport::{DeliveryTransport, MessageTransport};
