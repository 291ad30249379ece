//! Constants shared by the samples

use std::time::Duration;

/// Scheme of the connection URI
pub const SCHEME: &str = "amqps";

/// DNS suffix of the broker namespaces
///
/// Can be overridden at build time by setting `SERVICEBUS_DOMAIN` in the environment of the
/// compiler, e.g. for sovereign clouds.
pub const SERVICEBUS_DOMAIN: &str = match option_env!("SERVICEBUS_DOMAIN") {
    Some(domain) => domain,
    None => "servicebus.windows.net",
};

/// Number of status queries made in polling mode before giving up
pub const MAX_ATTEMPTS: u32 = 10;

/// Suspension between two status queries in polling mode
pub const BACKOFF: Duration = Duration::from_secs(2);

/// How long a blocking send waits for a terminal delivery state
pub const DEFAULT_SEND_DEADLINE: Duration = Duration::from_secs(30);

/// How long the receiver waits for the next message before leaving its loop
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of outgoing deliveries whose state can be tracked at once
pub const DEFAULT_OUTGOING_WINDOW: u32 = 5;

/// Number of incoming deliveries held unsettled by the receiver
pub const DEFAULT_INCOMING_WINDOW: u32 = 1;

/// Container id used when none is configured
pub const DEFAULT_CONTAINER_ID: &str = "servicebus-samples";

/// Message annotation carrying the Event Hubs partition key
pub const PARTITION_KEY_ANNOTATION: &str = "x-opt-partition-key";
