//! Mapping of [`OutboundMessage`] onto fe2o3-amqp messages

use std::{future::Future, pin::Pin};

use fe2o3_amqp::{
    link::SendError,
    types::{
        messaging::{
            AmqpValue, ApplicationProperties, Data, Header, Message, MessageAnnotations,
            MessageId as AmqpMessageId, Outcome, Properties,
        },
        primitives::{Binary, OrderedMap, SimpleValue, Symbol, Timestamp, Uuid, Value},
    },
    Sender,
};
use ordered_float::OrderedFloat;
use servicebus_delivery::{
    Identifier, ListItem, MessageId, OutboundMessage, Payload, PropertyValue,
};

/// Future resolving to the outcome reported by the broker
pub type OutcomeFut = Pin<Box<dyn Future<Output = Result<Outcome, SendError>> + Send>>;

/// Sections shared by all body kinds
struct Sections {
    header: Option<Header>,
    properties: Properties,
    application_properties: Option<ApplicationProperties>,
    message_annotations: Option<MessageAnnotations>,
}

impl From<&OutboundMessage> for Sections {
    fn from(message: &OutboundMessage) -> Self {
        // ttl is a uint on the wire
        let header = message.ttl.map(|ttl| {
            let millis = u32::try_from(ttl.as_millis()).unwrap_or(u32::MAX);
            Header::builder().ttl(Some(millis)).build()
        });

        let properties = Properties {
            message_id: message.message_id.as_ref().map(message_id),
            user_id: message.user_id.clone().map(Binary::from),
            to: message.address.clone(),
            subject: message.subject.clone(),
            reply_to: message.reply_to.clone(),
            correlation_id: message.correlation_id.as_ref().map(message_id),
            content_type: message.content_type.as_deref().map(Symbol::from),
            group_id: message.group_id.clone(),
            reply_to_group_id: message.reply_to_group_id.clone(),
            ..Default::default()
        };

        let application_properties = (!message.properties.is_empty()).then(|| {
            message
                .properties
                .iter()
                .fold(ApplicationProperties::builder(), |builder, (key, value)| {
                    builder.insert(key.clone(), simple_value(value))
                })
                .build()
        });

        let message_annotations = (!message.annotations.is_empty()).then(|| {
            message
                .annotations
                .iter()
                .fold(MessageAnnotations::builder(), |builder, (key, value)| {
                    builder.insert(Symbol::from(key.as_str()), Value::String(value.clone()))
                })
                .build()
        });

        Self {
            header,
            properties,
            application_properties,
            message_annotations,
        }
    }
}

fn uuid(id: &Identifier) -> Uuid {
    Uuid::from(*id.as_bytes())
}

fn message_id(id: &MessageId) -> AmqpMessageId {
    match id {
        MessageId::Uuid(id) => AmqpMessageId::Uuid(uuid(id)),
        MessageId::String(s) => AmqpMessageId::String(s.clone()),
    }
}

fn simple_value(value: &PropertyValue) -> SimpleValue {
    match value {
        PropertyValue::String(s) => SimpleValue::String(s.clone()),
        PropertyValue::Short(v) => SimpleValue::Short(*v),
        PropertyValue::Int(v) => SimpleValue::Int(*v),
        PropertyValue::Long(v) => SimpleValue::Long(*v),
        PropertyValue::Float(v) => SimpleValue::Float(OrderedFloat(*v)),
        PropertyValue::Double(v) => SimpleValue::Double(OrderedFloat(*v)),
        PropertyValue::Bool(v) => SimpleValue::Bool(*v),
        PropertyValue::Uuid(id) => SimpleValue::Uuid(uuid(id)),
        PropertyValue::Timestamp(ms) => SimpleValue::Timestamp(Timestamp::from_milliseconds(*ms)),
    }
}

enum Section<'a> {
    Value(Value),
    Data(&'a [u8]),
}

fn body_section(payload: &Payload) -> Section<'_> {
    match payload {
        Payload::Text(text) => Section::Value(Value::String(text.clone())),
        Payload::Bytes(bytes) => Section::Data(bytes),
        Payload::Map(entries) => {
            let mut map = OrderedMap::new();
            for (key, value) in entries {
                map.insert(Value::String(key.clone()), Value::String(value.clone()));
            }
            Section::Value(Value::Map(map))
        }
        Payload::List(items) => Section::Value(Value::List(
            items
                .iter()
                .map(|item| match item {
                    ListItem::String(s) => Value::String(s.clone()),
                    ListItem::Double(d) => Value::Double(OrderedFloat(*d)),
                })
                .collect(),
        )),
    }
}

fn value_message(message: &OutboundMessage, value: Value) -> Message<AmqpValue<Value>> {
    let sections = Sections::from(message);
    Message::builder()
        .header(sections.header)
        .properties(sections.properties)
        .application_properties(sections.application_properties)
        .message_annotations(sections.message_annotations)
        .value(value)
        .build()
}

fn data_message(message: &OutboundMessage, bytes: &[u8]) -> Message<Data> {
    let sections = Sections::from(message);
    Message::builder()
        .header(sections.header)
        .properties(sections.properties)
        .application_properties(sections.application_properties)
        .message_annotations(sections.message_annotations)
        .data(Binary::from(bytes.to_vec()))
        .build()
}

/// Builds the fe2o3-amqp message of a text, map or list body
///
/// Returns `None` for a bytes body, see [`to_data_message`].
pub fn to_value_message(message: &OutboundMessage) -> Option<Message<AmqpValue<Value>>> {
    match body_section(&message.body) {
        Section::Value(value) => Some(value_message(message, value)),
        Section::Data(_) => None,
    }
}

/// Builds the fe2o3-amqp message of a bytes body, carried in a single data section
///
/// Returns `None` for any other body.
pub fn to_data_message(message: &OutboundMessage) -> Option<Message<Data>> {
    match body_section(&message.body) {
        Section::Data(bytes) => Some(data_message(message, bytes)),
        Section::Value(_) => None,
    }
}

/// Transfers a message without waiting for its outcome
///
/// The returned future resolves once the broker has settled the delivery.
pub(crate) async fn send_batchable(
    sender: &mut Sender,
    message: &OutboundMessage,
) -> Result<OutcomeFut, SendError> {
    let fut: OutcomeFut = match body_section(&message.body) {
        Section::Value(value) => {
            let message = value_message(message, value);
            Box::pin(sender.send_batchable(message).await?)
        }
        Section::Data(bytes) => {
            let message = data_message(message, bytes);
            Box::pin(sender.send_batchable(message).await?)
        }
    };
    Ok(fut)
}

#[cfg(test)]
mod tests {
    use fe2o3_amqp::types::{
        messaging::MessageId as AmqpMessageId,
        primitives::{SimpleValue, Symbol, Value},
    };
    use servicebus_delivery::{BodyKind, Identifier, MessageFactory};

    use super::{to_data_message, to_value_message};

    fn build(kind: BodyKind) -> servicebus_delivery::OutboundMessage {
        MessageFactory::new("amqps://ns.servicebus.windows.net/q1")
            .build(kind, Identifier::generate().unwrap())
            .unwrap()
    }

    #[test]
    fn properties_section() {
        let outbound = build(BodyKind::Text);
        let message = to_value_message(&outbound).unwrap();

        let properties = message.properties.unwrap();
        assert!(matches!(properties.message_id, Some(AmqpMessageId::Uuid(_))));
        assert_eq!(properties.message_id, properties.correlation_id);
        assert_eq!(properties.subject.as_deref(), Some("TestSubject"));
        assert_eq!(properties.reply_to.as_deref(), Some("TestReplyTo"));
        assert_eq!(properties.group_id.as_deref(), Some("TestGroupId"));
        assert_eq!(
            properties.content_type,
            Some(Symbol::from("TestContentType"))
        );
        assert_eq!(
            properties.user_id.as_ref().map(|id| id.as_slice()),
            Some(&b"TestUserId"[..])
        );
        assert_eq!(message.header.unwrap().ttl, Some(86_400_000));
        assert_eq!(message.body.0, Value::String("This is a text message".into()));
    }

    #[test]
    fn application_properties_keep_their_types() {
        let message = to_value_message(&build(BodyKind::List)).unwrap();
        let properties = message.application_properties.unwrap();

        assert_eq!(properties.0.len(), 11);
        assert_eq!(properties.0.get("TestShort"), Some(&SimpleValue::Short(16)));
        assert_eq!(properties.0.get("TestLong"), Some(&SimpleValue::Long(1000)));
        assert!(matches!(
            properties.0.get("TestGuid"),
            Some(SimpleValue::Uuid(_))
        ));
        assert!(matches!(
            properties.0.get("TestDateTime"),
            Some(SimpleValue::Timestamp(ts)) if ts.milliseconds() == 1_356_998_400_000
        ));
        match message.body.0 {
            Value::List(items) => assert_eq!(items.len(), 4),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn bytes_go_into_a_data_section() {
        let outbound = build(BodyKind::Bytes);
        assert!(to_value_message(&outbound).is_none());
        let message = to_data_message(&outbound).unwrap();
        assert_eq!(message.body.0.as_slice(), b"This is a bytes message");

        assert!(to_data_message(&build(BodyKind::Map)).is_none());
    }

    #[test]
    fn partition_key_annotation() {
        let outbound = MessageFactory::event_hub(1, Some("key-1"));
        let message = to_data_message(&outbound).unwrap();
        let annotations = message.message_annotations.unwrap();
        assert_eq!(annotations.0.len(), 1);
        assert!(message.application_properties.is_some());
        assert!(message.header.is_none());
    }
}
