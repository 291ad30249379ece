//! Delivery states and their classification

use std::fmt;

/// State of a sent message as reported by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeliveryStatus {
    /// Nothing is known about the delivery yet
    #[default]
    Unknown,

    /// Sent, outcome not reported yet
    Pending,

    /// The broker accepted the message
    Accepted,

    /// The broker rejected the message
    Rejected,

    /// The broker released the message without processing it
    Released,

    /// The broker modified the delivery, its fate may still change
    Modified,

    /// The message never made it onto the wire
    Aborted,

    /// Settled without a reported outcome, e.g. sent pre-settled
    Settled,
}

impl DeliveryStatus {
    /// Whether the status can no longer change
    pub fn is_terminal(&self) -> bool {
        match self {
            DeliveryStatus::Accepted
            | DeliveryStatus::Rejected
            | DeliveryStatus::Released
            | DeliveryStatus::Aborted
            | DeliveryStatus::Settled => true,
            DeliveryStatus::Unknown | DeliveryStatus::Pending | DeliveryStatus::Modified => false,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeliveryStatus::Unknown => "UNKNOWN",
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Accepted => "ACCEPTED",
            DeliveryStatus::Rejected => "REJECTED",
            DeliveryStatus::Released => "RELEASED",
            DeliveryStatus::Modified => "MODIFIED",
            DeliveryStatus::Aborted => "ABORTED",
            DeliveryStatus::Settled => "SETTLED",
        };
        f.write_str(s)
    }
}

/// What the tracker concluded about a delivery
#[derive(Debug)]
pub enum DeliveryOutcome<E> {
    /// The broker accepted the message
    Success,

    /// The broker rejected the message
    Rejected,

    /// The message was never transmitted
    Aborted,

    /// No terminal state within the attempt budget, assumed failed
    ///
    /// The broker may still be processing the message.
    Inconclusive,

    /// Ended in a state that says nothing definite about the message
    Unclear(DeliveryStatus),

    /// The transport failed while sending or querying
    Transport(E),
}

impl<E> DeliveryOutcome<E> {
    /// Classifies the last observed status
    pub fn from_status(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Accepted => DeliveryOutcome::Success,
            DeliveryStatus::Rejected => DeliveryOutcome::Rejected,
            DeliveryStatus::Aborted => DeliveryOutcome::Aborted,
            DeliveryStatus::Pending => DeliveryOutcome::Inconclusive,
            status => DeliveryOutcome::Unclear(status),
        }
    }

    /// Whether the message is known to have been accepted
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Success)
    }
}

impl<E: fmt::Display> fmt::Display for DeliveryOutcome<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Success => write!(f, "successful!"),
            DeliveryOutcome::Rejected => write!(f, "rejected by the broker"),
            DeliveryOutcome::Aborted => write!(f, "failed, never sent on network"),
            DeliveryOutcome::Inconclusive => write!(f, "giving up, assuming send failed"),
            DeliveryOutcome::Unclear(status) => write!(f, "unclear ({status})"),
            DeliveryOutcome::Transport(err) => write!(f, "transport error: {err}"),
        }
    }
}
