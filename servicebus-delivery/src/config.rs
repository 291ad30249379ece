//! Runtime configuration of a transport session
//!
//! Settlement modes, windows, the delivery mode and the key-encoding rule are explicit values
//! handed to the transport adapter when it connects, instead of being implied by the version of
//! the AMQP client that happens to be linked.

use std::time::Duration;

use crate::{
    constants::{
        BACKOFF, DEFAULT_CONTAINER_ID, DEFAULT_INCOMING_WINDOW, DEFAULT_OUTGOING_WINDOW,
        DEFAULT_RECEIVE_TIMEOUT, DEFAULT_SEND_DEADLINE, MAX_ATTEMPTS,
    },
    key::KeyEncoding,
};

/// Settlement policy of the sending end of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SenderSettleMode {
    /// Deliveries are sent unsettled and the broker reports an outcome
    #[default]
    Unsettled,

    /// Deliveries are settled before they are sent, no outcome is reported
    Settled,

    /// The sender decides per delivery
    Mixed,
}

/// Settlement policy of the receiving end of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiverSettleMode {
    /// The receiver settles as soon as it has decided on an outcome
    #[default]
    First,

    /// The receiver settles only after the sender has settled
    Second,
}

/// How the tracker waits for the outcome of a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// One status query that waits up to `deadline` for a terminal state
    Blocking {
        /// Upper bound on the wait inside the transport
        deadline: Duration,
    },

    /// Repeated instantaneous status queries with a fixed suspension in between
    Polling {
        /// Number of queries before giving up, at least one query is always made
        max_attempts: u32,

        /// Suspension between two queries
        backoff: Duration,
    },
}

impl Default for DeliveryMode {
    fn default() -> Self {
        Self::blocking()
    }
}

impl DeliveryMode {
    /// Blocking mode with the default deadline
    pub fn blocking() -> Self {
        Self::Blocking {
            deadline: DEFAULT_SEND_DEADLINE,
        }
    }

    /// Polling mode with the default attempt budget and backoff
    pub fn polling() -> Self {
        Self::Polling {
            max_attempts: MAX_ATTEMPTS,
            backoff: BACKOFF,
        }
    }

    pub(crate) fn max_attempts(&self) -> u32 {
        match self {
            DeliveryMode::Blocking { .. } => 1,
            DeliveryMode::Polling { max_attempts, .. } => (*max_attempts).max(1),
        }
    }

    /// How long a single status query may wait
    pub(crate) fn wait(&self) -> Option<Duration> {
        match self {
            DeliveryMode::Blocking { deadline } => Some(*deadline),
            DeliveryMode::Polling { .. } => None,
        }
    }

    pub(crate) fn backoff(&self) -> Duration {
        match self {
            DeliveryMode::Blocking { .. } => Duration::ZERO,
            DeliveryMode::Polling { backoff, .. } => *backoff,
        }
    }
}

/// Configuration handed to a transport when it connects
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Container id announced in the open frame
    pub container_id: String,

    /// Whether the shared-access key is percent-encoded in the connection URI
    pub key_encoding: KeyEncoding,

    /// Settle mode requested on attached links, sending side
    pub sender_settle_mode: SenderSettleMode,

    /// Settle mode requested on attached links, receiving side
    pub receiver_settle_mode: ReceiverSettleMode,

    /// Session outgoing window
    pub outgoing_window: u32,

    /// Session incoming window, also used as link credit by the receiver
    pub incoming_window: u32,

    /// How outcomes of sent messages are awaited
    pub delivery_mode: DeliveryMode,

    /// How long the receiver waits for the next message
    pub receive_timeout: Duration,
}

impl TransportConfig {
    /// Creates a builder
    ///
    /// The key encoding has no sensible default and must be supplied by whoever picks the
    /// transport.
    pub fn builder(key_encoding: KeyEncoding) -> Builder {
        Builder::new(key_encoding)
    }
}

/// Builder for [`TransportConfig`]
#[derive(Debug, Clone)]
pub struct Builder {
    config: TransportConfig,
}

impl Builder {
    /// Creates a builder with the default settle modes, windows and timeouts
    pub fn new(key_encoding: KeyEncoding) -> Self {
        Self {
            config: TransportConfig {
                container_id: String::from(DEFAULT_CONTAINER_ID),
                key_encoding,
                sender_settle_mode: SenderSettleMode::default(),
                receiver_settle_mode: ReceiverSettleMode::default(),
                outgoing_window: DEFAULT_OUTGOING_WINDOW,
                incoming_window: DEFAULT_INCOMING_WINDOW,
                delivery_mode: DeliveryMode::default(),
                receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
            },
        }
    }

    /// Container id
    pub fn container_id(mut self, container_id: impl Into<String>) -> Self {
        self.config.container_id = container_id.into();
        self
    }

    /// Settle mode of the sending end
    pub fn sender_settle_mode(mut self, mode: SenderSettleMode) -> Self {
        self.config.sender_settle_mode = mode;
        self
    }

    /// Settle mode of the receiving end
    pub fn receiver_settle_mode(mut self, mode: ReceiverSettleMode) -> Self {
        self.config.receiver_settle_mode = mode;
        self
    }

    /// Outgoing window
    pub fn outgoing_window(mut self, window: u32) -> Self {
        self.config.outgoing_window = window;
        self
    }

    /// Incoming window
    pub fn incoming_window(mut self, window: u32) -> Self {
        self.config.incoming_window = window;
        self
    }

    /// Delivery mode
    pub fn delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.config.delivery_mode = mode;
        self
    }

    /// Receive timeout
    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.config.receive_timeout = timeout;
        self
    }

    /// Builds the configuration
    pub fn build(self) -> TransportConfig {
        self.config
    }
}
