//! Sending session over fe2o3-amqp

use std::{fmt, time::Duration};

use async_trait::async_trait;
use fe2o3_amqp::{
    connection::ConnectionHandle,
    sasl_profile::SaslProfile,
    session::SessionHandle,
    types::{definitions, messaging::Outcome},
    Connection, Sender, Session,
};
use futures_util::FutureExt;
use servicebus_delivery::{
    config::{ReceiverSettleMode, SenderSettleMode},
    DeliveryStatus, DeliveryTransport, KeyEncoding, MessageTransport, OutboundMessage,
    TransportConfig,
};

use crate::{
    convert::{self, OutcomeFut},
    endpoint::Endpoint,
    Error, Result,
};

/// The key must be percent-encoded, the address is parsed as a URL before the credentials are
/// decoded
pub const KEY_ENCODING: KeyEncoding = KeyEncoding::PercentEncoded;

/// Default configuration for this transport
pub fn transport_config() -> TransportConfig {
    TransportConfig::builder(KEY_ENCODING).build()
}

pub(crate) fn sender_settle_mode(mode: SenderSettleMode) -> definitions::SenderSettleMode {
    match mode {
        SenderSettleMode::Unsettled => definitions::SenderSettleMode::Unsettled,
        SenderSettleMode::Settled => definitions::SenderSettleMode::Settled,
        SenderSettleMode::Mixed => definitions::SenderSettleMode::Mixed,
    }
}

pub(crate) fn receiver_settle_mode(mode: ReceiverSettleMode) -> definitions::ReceiverSettleMode {
    match mode {
        ReceiverSettleMode::First => definitions::ReceiverSettleMode::First,
        ReceiverSettleMode::Second => definitions::ReceiverSettleMode::Second,
    }
}

/// Opens the connection and begins the session both samples run on
pub(crate) async fn open(
    endpoint: &Endpoint,
    config: &TransportConfig,
) -> Result<(ConnectionHandle<()>, SessionHandle<()>)> {
    let builder = Connection::builder()
        .container_id(config.container_id.clone())
        .hostname(&endpoint.hostname[..])
        .alt_tls_establishment(endpoint.secure);
    let opened = match &endpoint.credentials {
        Some((username, password)) => {
            builder
                .sasl_profile(SaslProfile::Plain {
                    username: username.clone(),
                    password: password.clone(),
                })
                .open(&endpoint.url[..])
                .await
        }
        None => builder.open(&endpoint.url[..]).await,
    };
    let mut connection = opened.map_err(|err| Error::setup("Opening connection", err))?;
    tracing::debug!(url = %endpoint.url, "Connection opened");

    let session = Session::builder()
        .outgoing_window(config.outgoing_window)
        .incoming_window(config.incoming_window)
        .begin(&mut connection)
        .await
        .map_err(|err| Error::setup("Beginning session", err))?;

    Ok((connection, session))
}

fn status(outcome: &Outcome) -> DeliveryStatus {
    match outcome {
        Outcome::Accepted(_) => DeliveryStatus::Accepted,
        Outcome::Rejected(_) => DeliveryStatus::Rejected,
        Outcome::Released(_) => DeliveryStatus::Released,
        Outcome::Modified(_) => DeliveryStatus::Modified,
        #[allow(unreachable_patterns)]
        _ => DeliveryStatus::Unknown,
    }
}

enum Tracked {
    InFlight(OutcomeFut),
    Resolved(DeliveryStatus),
    Lost,
}

/// Handle of a message sent through [`Fe2o3Session`]
pub struct DeliveryHandle {
    state: Tracked,
}

impl fmt::Debug for DeliveryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            Tracked::InFlight(_) => String::from("InFlight"),
            Tracked::Resolved(status) => format!("Resolved({status})"),
            Tracked::Lost => String::from("Lost"),
        };
        f.debug_struct("DeliveryHandle")
            .field("state", &state)
            .finish()
    }
}

impl DeliveryHandle {
    async fn status(&mut self, wait: Option<Duration>) -> Result<DeliveryStatus> {
        let fut = match &mut self.state {
            Tracked::InFlight(fut) => fut,
            Tracked::Resolved(status) => return Ok(*status),
            Tracked::Lost => return Err(Error::DeliveryLost),
        };

        let resolved = match wait {
            None => fut.as_mut().now_or_never(),
            Some(deadline) => tokio::time::timeout(deadline, fut.as_mut()).await.ok(),
        };

        match resolved {
            None => Ok(DeliveryStatus::Pending),
            Some(Ok(outcome)) => {
                let status = status(&outcome);
                tracing::debug!(%status, "Delivery settled by the broker");
                self.state = Tracked::Resolved(status);
                Ok(status)
            }
            Some(Err(err)) => {
                self.state = Tracked::Lost;
                Err(err.into())
            }
        }
    }
}

/// A connection, a session and a sending link to one entity
pub struct Fe2o3Session {
    connection: ConnectionHandle<()>,
    session: SessionHandle<()>,
    sender: Sender,
    presettled: bool,
}

impl fmt::Debug for Fe2o3Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fe2o3Session")
            .field("presettled", &self.presettled)
            .finish_non_exhaustive()
    }
}

impl Fe2o3Session {
    /// Connects to the broker and attaches a sender to the entity named in `address`
    pub async fn connect(address: &str, config: &TransportConfig) -> Result<Self> {
        let endpoint = Endpoint::parse(address)?;
        let (connection, mut session) = open(&endpoint, config).await?;

        let sender = Sender::builder()
            .name(format!("{}-sender", config.container_id))
            .target(endpoint.entity.clone())
            .sender_settle_mode(sender_settle_mode(config.sender_settle_mode))
            .receiver_settle_mode(receiver_settle_mode(config.receiver_settle_mode))
            .attach(&mut session)
            .await
            .map_err(|err| Error::setup("Attaching sender", err))?;
        tracing::debug!(entity = %endpoint.entity, "Sender attached");

        Ok(Self {
            connection,
            session,
            sender,
            presettled: config.sender_settle_mode == SenderSettleMode::Settled,
        })
    }
}

#[async_trait]
impl DeliveryTransport for Fe2o3Session {
    type Handle = DeliveryHandle;
    type Error = Error;

    async fn query_status(
        &mut self,
        handle: &mut DeliveryHandle,
        wait: Option<Duration>,
    ) -> Result<DeliveryStatus> {
        handle.status(wait).await
    }

    /// The broker settles along with the outcome, only the pending future is dropped here
    async fn settle(&mut self, handle: DeliveryHandle) -> Result<()> {
        drop(handle);
        Ok(())
    }
}

#[async_trait]
impl MessageTransport for Fe2o3Session {
    async fn send(&mut self, message: &OutboundMessage) -> Result<DeliveryHandle> {
        let fut = convert::send_batchable(&mut self.sender, message).await?;
        let state = if self.presettled {
            Tracked::Resolved(DeliveryStatus::Settled)
        } else {
            Tracked::InFlight(fut)
        };
        Ok(DeliveryHandle { state })
    }

    async fn stop(self) -> Result<()> {
        let Self {
            mut connection,
            mut session,
            sender,
            ..
        } = self;
        sender
            .close()
            .await
            .map_err(|err| Error::shutdown("Closing sender", err))?;
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
