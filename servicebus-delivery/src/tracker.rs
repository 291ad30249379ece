//! Resolution of the final state of sent messages
//!
//! The tracker asks the transport for the status of a delivery until the status is terminal or
//! the attempt budget is spent, classifies the last status it saw, and settles the delivery
//! exactly once. In [`DeliveryMode::Blocking`] the single query waits inside the transport and
//! the loop collapses to one iteration; in [`DeliveryMode::Polling`] the tracker sleeps for the
//! backoff between instantaneous queries. Both modes share the classification.

use crate::{
    config::DeliveryMode,
    message::OutboundMessage,
    status::{DeliveryOutcome, DeliveryStatus},
    transport::{DeliveryTransport, MessageTransport},
};

/// Result of tracking one delivery
#[derive(Debug)]
pub struct TrackReport<E> {
    /// Classification of the delivery
    pub outcome: DeliveryOutcome<E>,

    /// Last status returned by the transport, `Unknown` if none was
    pub last_status: DeliveryStatus,

    /// Number of status queries made
    pub queries: u32,

    /// Failure to settle the delivery, which does not change the outcome
    pub settle_error: Option<E>,
}

/// Awaits and classifies the outcome of deliveries
#[derive(Debug, Clone)]
pub struct DeliveryTracker {
    mode: DeliveryMode,
}

impl DeliveryTracker {
    /// Creates a tracker operating in the given mode
    pub fn new(mode: DeliveryMode) -> Self {
        Self { mode }
    }

    /// The mode the tracker operates in
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Tracks a delivery to its resolution and settles it
    ///
    /// A transport error stops the queries immediately and is reported as
    /// [`DeliveryOutcome::Transport`]; settlement is still attempted.
    pub async fn track<T>(&self, transport: &mut T, mut handle: T::Handle) -> TrackReport<T::Error>
    where
        T: DeliveryTransport,
    {
        let max_attempts = self.mode.max_attempts();
        let wait = self.mode.wait();

        let mut attempt = 0;
        let mut queries = 0;
        let mut last_status = DeliveryStatus::Unknown;
        let mut transport_error = None;

        loop {
            queries += 1;
            match transport.query_status(&mut handle, wait).await {
                Ok(status) => last_status = status,
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!(error = %err, "Querying delivery status failed");
                    #[cfg(feature = "log")]
                    log::error!("Querying delivery status failed: {}", err);
                    transport_error = Some(err);
                    break;
                }
            }

            #[cfg(feature = "tracing")]
            tracing::info!(status = %last_status, query = queries, "Message status");
            #[cfg(feature = "log")]
            log::info!("Message status {} (query {})", last_status, queries);

            if last_status.is_terminal() {
                break;
            }

            attempt += 1;
            if attempt == max_attempts {
                break;
            }

            let backoff = self.mode.backoff();
            #[cfg(feature = "tracing")]
            tracing::info!(?backoff, "Sleeping to give broker time to ack message");
            #[cfg(feature = "log")]
            log::info!("Sleeping {:?} to give broker time to ack message", backoff);
            tokio::time::sleep(backoff).await;
        }

        let outcome = match transport_error {
            Some(err) => DeliveryOutcome::Transport(err),
            None => DeliveryOutcome::from_status(last_status),
        };

        let settle_error = match transport.settle(handle).await {
            Ok(()) => None,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "Settling delivery failed");
                #[cfg(feature = "log")]
                log::warn!("Settling delivery failed: {}", err);
                Some(err)
            }
        };

        TrackReport {
            outcome,
            last_status,
            queries,
            settle_error,
        }
    }

    /// Sends a message and tracks its delivery
    ///
    /// A failed send yields a [`DeliveryOutcome::Transport`] report without any query or
    /// settlement, since no delivery exists.
    pub async fn send_and_track<T>(
        &self,
        transport: &mut T,
        message: &OutboundMessage,
    ) -> TrackReport<T::Error>
    where
        T: MessageTransport,
    {
        self.send_and_track_with(transport, message, || {}).await
    }

    /// Same as [`send_and_track`](Self::send_and_track), calling `on_sent` once the transport
    /// has taken the message and before the first status query
    pub async fn send_and_track_with<T, F>(
        &self,
        transport: &mut T,
        message: &OutboundMessage,
        on_sent: F,
    ) -> TrackReport<T::Error>
    where
        T: MessageTransport,
        F: FnOnce() + Send,
    {
        match transport.send(message).await {
            Ok(handle) => {
                on_sent();
                self.track(transport, handle).await
            }
            Err(err) => TrackReport {
                outcome: DeliveryOutcome::Transport(err),
                last_status: DeliveryStatus::Unknown,
                queries: 0,
                settle_error: None,
            },
        }
    }
}
