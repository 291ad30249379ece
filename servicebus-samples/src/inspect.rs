//! Human-readable reports of received messages

use std::{fmt, time::Duration};

use fe2o3_amqp::types::{
    messaging::{Body, Message, MessageId},
    primitives::{SimpleValue, Value},
};
use servicebus_delivery::Identifier;

/// Message or correlation id as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedId {
    /// Printable form of the id
    pub text: String,

    /// Whether the id was sent as a UUID
    pub is_uuid: bool,
}

impl From<&MessageId> for ReceivedId {
    fn from(id: &MessageId) -> Self {
        let (text, is_uuid) = match id {
            MessageId::Ulong(n) => (n.to_string(), false),
            MessageId::Uuid(uuid) => (Identifier::from_bytes(*uuid.as_inner()).to_string(), true),
            MessageId::Binary(bytes) => (format!("{:?}", bytes.as_slice()), false),
            MessageId::String(s) => (s.clone(), false),
        };
        Self { text, is_uuid }
    }
}

impl fmt::Display for ReceivedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_uuid {
            f.write_str(&self.text)
        } else {
            write!(f, "{} (not a UUID)", self.text)
        }
    }
}

/// What the receiver prints for each message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReceivedSummary {
    /// Value of the `MessageType` application property
    pub message_type: Option<String>,

    /// The `to` address
    pub to: Option<String>,

    /// Content type
    pub content_type: Option<String>,

    /// Message id
    pub message_id: Option<ReceivedId>,

    /// Correlation id
    pub correlation_id: Option<ReceivedId>,

    /// Reply-to address
    pub reply_to: Option<String>,

    /// Reply-to group id
    pub reply_to_group_id: Option<String>,

    /// Group id
    pub group_id: Option<String>,

    /// User id, lossily decoded as UTF-8
    pub user_id: Option<String>,

    /// Time to live
    pub ttl: Option<Duration>,

    /// Application properties, formatted
    pub properties: Vec<(String, String)>,

    /// Short description of the body
    pub body: String,
}

impl ReceivedSummary {
    /// Summarizes a received message
    pub fn new(message: &Message<Body<Value>>) -> Self {
        let mut summary = Self {
            ttl: message
                .header
                .as_ref()
                .and_then(|h| h.ttl)
                .map(|ms| Duration::from_millis(u64::from(ms))),
            body: describe(&message.body),
            ..Default::default()
        };

        if let Some(p) = &message.properties {
            summary.to = p.to.clone();
            summary.content_type = p.content_type.as_ref().map(|s| s.0.clone());
            summary.message_id = p.message_id.as_ref().map(ReceivedId::from);
            summary.correlation_id = p.correlation_id.as_ref().map(ReceivedId::from);
            summary.reply_to = p.reply_to.clone();
            summary.reply_to_group_id = p.reply_to_group_id.clone();
            summary.group_id = p.group_id.clone();
            summary.user_id = p
                .user_id
                .as_ref()
                .map(|id| String::from_utf8_lossy(id.as_slice()).into_owned());
        }

        if let Some(p) = &message.application_properties {
            summary.message_type = match p.0.get("MessageType") {
                Some(SimpleValue::String(s)) => Some(s.clone()),
                _ => None,
            };
            summary.properties = p
                .0
                .iter()
                .map(|(key, value)| (key.clone(), simple(value)))
                .collect();
        }

        summary
    }
}

fn or_none<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(|| String::from("<none>"), |v| v.to_string())
}

impl fmt::Display for ReceivedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Received {}",
            self.message_type.as_deref().unwrap_or("message")
        )?;
        writeln!(f, "  to: {}", or_none(&self.to))?;
        writeln!(f, "  content type: {}", or_none(&self.content_type))?;
        writeln!(f, "  message id: {}", or_none(&self.message_id))?;
        writeln!(f, "  correlation id: {}", or_none(&self.correlation_id))?;
        writeln!(f, "  reply to: {}", or_none(&self.reply_to))?;
        writeln!(f, "  reply to group id: {}", or_none(&self.reply_to_group_id))?;
        writeln!(f, "  group id: {}", or_none(&self.group_id))?;
        writeln!(f, "  user id: {}", or_none(&self.user_id))?;
        match self.ttl {
            Some(ttl) => writeln!(f, "  ttl: {} ms", ttl.as_millis())?,
            None => writeln!(f, "  ttl: <none>")?,
        }
        writeln!(f, "  body: {}", self.body)?;
        write!(f, "  properties:")?;
        for (key, value) in &self.properties {
            write!(f, "\n    {key} = {value}")?;
        }
        Ok(())
    }
}

fn simple(value: &SimpleValue) -> String {
    match value {
        SimpleValue::String(s) => s.clone(),
        SimpleValue::Bool(v) => v.to_string(),
        SimpleValue::Short(v) => v.to_string(),
        SimpleValue::Int(v) => v.to_string(),
        SimpleValue::Long(v) => v.to_string(),
        SimpleValue::Float(v) => v.0.to_string(),
        SimpleValue::Double(v) => v.0.to_string(),
        SimpleValue::Uuid(uuid) => Identifier::from_bytes(*uuid.as_inner()).to_string(),
        SimpleValue::Timestamp(ts) => format!("{} ms since epoch", ts.milliseconds()),
        other => format!("{other:?}"),
    }
}

fn describe(body: &Body<Value>) -> String {
    if let Ok(value) = body.try_as_value() {
        return match value {
            Value::String(s) => format!("{s:?}"),
            other => format!("{other:?}"),
        };
    }
    if let Ok(sections) = body.try_as_data() {
        let len: usize = sections.map(|data| data.len()).sum();
        return format!("{len} bytes");
    }
    if let Ok(sections) = body.try_as_sequence() {
        return format!("{} sequence section(s)", sections.count());
    }
    String::from("empty")
}
