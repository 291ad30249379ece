//! Seams between the samples and the AMQP client
//!
//! Connecting is adapter specific (it needs the address and a
//! [`TransportConfig`](crate::TransportConfig)), so it is not part of the traits.

use std::time::Duration;

use async_trait::async_trait;

use crate::{message::OutboundMessage, status::DeliveryStatus};

/// Status queries and settlement of sent deliveries
#[async_trait]
pub trait DeliveryTransport: Send {
    /// Reference to one sent message
    type Handle: Send;

    /// Connection-level failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// Current status of a delivery
    ///
    /// With `wait` set to `None` the query returns immediately. With `Some(deadline)` it
    /// suspends until the status is terminal or the deadline has passed, whichever is first.
    /// Once a terminal status has been returned for a handle, every later query of that handle
    /// returns the same status.
    async fn query_status(
        &mut self,
        handle: &mut Self::Handle,
        wait: Option<Duration>,
    ) -> Result<DeliveryStatus, Self::Error>;

    /// Releases the bookkeeping kept for a delivery
    async fn settle(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;
}

/// A started sending session
#[async_trait]
pub trait MessageTransport: DeliveryTransport {
    /// Hands a message over for sending and returns its delivery handle
    async fn send(&mut self, message: &OutboundMessage) -> Result<Self::Handle, Self::Error>;

    /// Closes the link, the session and the connection
    async fn stop(self) -> Result<(), Self::Error>;
}
