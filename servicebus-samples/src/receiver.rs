//! Receiving side of the samples

use std::{fmt, time::Duration};

use fe2o3_amqp::{
    connection::ConnectionHandle,
    link::receiver::CreditMode,
    session::SessionHandle,
    types::{definitions, messaging::Body, primitives::Value},
    Delivery, Receiver,
};
use servicebus_delivery::{config::ReceiverSettleMode, TransportConfig};

use crate::{
    endpoint::Endpoint,
    inspect::ReceivedSummary,
    session::{open, receiver_settle_mode, sender_settle_mode},
    Error, Result, KEY_ENCODING,
};

/// A delivery whose body may be of any section type
pub type AnyDelivery = Delivery<Body<Value>>;

/// Default configuration of the receiving sample
///
/// Unlike the senders, the receiver settles only after the broker has settled.
pub fn receiver_config() -> TransportConfig {
    TransportConfig::builder(KEY_ENCODING)
        .receiver_settle_mode(ReceiverSettleMode::Second)
        .build()
}

/// Attach parameters of the receiving link
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinkSettings {
    pub(crate) name: String,
    pub(crate) snd_settle_mode: definitions::SenderSettleMode,
    pub(crate) rcv_settle_mode: definitions::ReceiverSettleMode,
    pub(crate) credit: u32,
}

impl LinkSettings {
    /// Link parameters taken from `config`, including both settle modes
    pub(crate) fn new(config: &TransportConfig) -> Self {
        Self {
            name: format!("{}-receiver", config.container_id),
            snd_settle_mode: sender_settle_mode(config.sender_settle_mode),
            rcv_settle_mode: receiver_settle_mode(config.receiver_settle_mode),
            credit: config.incoming_window,
        }
    }
}

/// A connection, a session and a receiving link from one entity
pub struct Fe2o3Receiver {
    connection: ConnectionHandle<()>,
    session: SessionHandle<()>,
    receiver: Receiver,
    timeout: Duration,
}

impl fmt::Debug for Fe2o3Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fe2o3Receiver")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Fe2o3Receiver {
    /// Connects to the broker and attaches a receiver to the entity named in `address`
    ///
    /// The link keeps `incoming_window` credits outstanding.
    pub async fn connect(address: &str, config: &TransportConfig) -> Result<Self> {
        let endpoint = Endpoint::parse(address)?;
        let (connection, mut session) = open(&endpoint, config).await?;

        let link = LinkSettings::new(config);
        let receiver = Receiver::builder()
            .name(link.name)
            .source(endpoint.entity.clone())
            .credit_mode(CreditMode::Auto(link.credit))
            .sender_settle_mode(link.snd_settle_mode)
            .receiver_settle_mode(link.rcv_settle_mode)
            .attach(&mut session)
            .await
            .map_err(|err| Error::setup("Attaching receiver", err))?;
        tracing::debug!(entity = %endpoint.entity, "Receiver attached");

        Ok(Self {
            connection,
            session,
            receiver,
            timeout: config.receive_timeout,
        })
    }

    /// Waits for the next message, `None` once the receive timeout has passed without one
    pub async fn recv(&mut self) -> Result<Option<AnyDelivery>> {
        match tokio::time::timeout(self.timeout, self.receiver.recv::<Body<Value>>()).await {
            Ok(delivery) => Ok(Some(delivery?)),
            Err(_) => Ok(None),
        }
    }

    /// Settles a message as accepted, removing it from the entity
    pub async fn accept(&mut self, delivery: &AnyDelivery) -> Result<()> {
        self.receiver.accept(delivery).await?;
        Ok(())
    }

    /// Receives, reports and accepts messages until none arrives within the receive timeout
    ///
    /// Returns the number of messages accepted.
    pub async fn drain<F>(&mut self, mut report: F) -> Result<usize>
    where
        F: FnMut(&ReceivedSummary),
    {
        let mut count = 0;
        while let Some(delivery) = self.recv().await? {
            report(&ReceivedSummary::new(delivery.message()));
            self.accept(&delivery).await?;
            count += 1;
        }
        tracing::info!(count, "No more messages");
        Ok(count)
    }

    /// Closes the link, the session and the connection
    pub async fn stop(self) -> Result<()> {
        let Self {
            mut connection,
            mut session,
            receiver,
            ..
        } = self;
        receiver
            .close()
            .await
            .map_err(|err| Error::shutdown("Closing receiver", err))?;
        session
            .end()
            .await
            .map_err(|err| Error::shutdown("Ending session", err))?;
        connection
            .close()
            .await
            .map_err(|err| Error::shutdown("Closing connection", err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fe2o3_amqp::types::definitions;
    use servicebus_delivery::{
        config::{ReceiverSettleMode, SenderSettleMode},
        TransportConfig,
    };

    use super::{receiver_config, LinkSettings};
    use crate::KEY_ENCODING;

    #[test]
    fn default_link_asks_for_unsettled_deliveries() {
        let config = receiver_config();
        let link = LinkSettings::new(&config);

        assert_eq!(link.snd_settle_mode, definitions::SenderSettleMode::Unsettled);
        assert_eq!(link.rcv_settle_mode, definitions::ReceiverSettleMode::Second);
        assert_eq!(link.credit, config.incoming_window);
        assert_eq!(link.name, format!("{}-receiver", config.container_id));
    }

    #[test]
    fn senders_keep_first_settle_mode() {
        let config = crate::transport_config();
        assert_eq!(config.receiver_settle_mode, ReceiverSettleMode::First);
        assert_eq!(config.sender_settle_mode, SenderSettleMode::Unsettled);
    }

    #[test]
    fn link_follows_configured_modes_and_window() {
        let config = TransportConfig::builder(KEY_ENCODING)
            .container_id("c1")
            .sender_settle_mode(SenderSettleMode::Mixed)
            .receiver_settle_mode(ReceiverSettleMode::First)
            .incoming_window(7)
            .build();
        let link = LinkSettings::new(&config);

        assert_eq!(link.name, "c1-receiver");
        assert_eq!(link.snd_settle_mode, definitions::SenderSettleMode::Mixed);
        assert_eq!(link.rcv_settle_mode, definitions::ReceiverSettleMode::First);
        assert_eq!(link.credit, 7);
    }
}
