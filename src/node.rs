//! Self-describing record trees.
//!
//! Extraction never binds to a generated schema. Instead every record is seen
//! through the [`Node`] capability: an ordered list of [`FieldDescriptor`]s and
//! a way to read the value behind each one. Anything that can describe its own
//! fields (generated message types, a dynamic registry, or the owned
//! [`Message`] tree defined here) can be walked.
//!
//! ## Descriptor drives interpretation
//!
//! A field's [`FieldKind`] and [`Cardinality`] are fixed for the lifetime of
//! the node and decide how the walker treats the value:
//!
//! | Kind | Singular | Repeated |
//! |---|---|---|
//! | `Message` | recurse once | recurse into each element |
//! | `Bytes` / scalars | one leaf visit | one leaf visit per element |
//!
//! A value whose runtime variant disagrees with its descriptor is not an
//! error; visitors simply ignore what they cannot interpret.
//!
//! ## The owned tree
//!
//! [`Message`] is a plain tagged-union tree that serializes with serde. It is
//! what [`JsonTreeDecoder`](crate::source::JsonTreeDecoder) produces and what
//! the tests build by hand:
//!
//! ```
//! use e2e_preview::node::Message;
//!
//! let camera = Message::new()
//!     .with_string("camera", "CAMERA_FRONT")
//!     .with_bytes("image", vec![0xFF, 0xD8, 0xFF]);
//! let record = Message::new().with_messages("images", vec![camera]);
//! assert_eq!(record.fields.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Whether a field holds one value or a list of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Singular,
    Repeated,
}

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    SignedInt,
    UnsignedInt,
    String,
    Bytes,
    Message,
    Enum,
    /// Floats, doubles and booleans.
    OtherScalar,
}

impl FieldKind {
    /// Integer kinds as far as metadata lookup is concerned. Enums are not
    /// integers here.
    pub fn is_integer(self) -> bool {
        matches!(self, FieldKind::SignedInt | FieldKind::UnsignedInt)
    }
}

/// Static description of one field of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub cardinality: Cardinality,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, cardinality: Cardinality, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            cardinality,
            kind,
        }
    }
}

/// A single scalar or bytes value borrowed from a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Int(i64),
    UInt(u64),
    Str(&'a str),
    Bytes(&'a [u8]),
    /// Enum values carry their wire number.
    Enum(i32),
    Float(f64),
    Bool(bool),
}

impl Scalar<'_> {
    /// Text form used when a scalar becomes a hint label.
    pub fn to_label(&self) -> String {
        match self {
            Scalar::Int(v) => v.to_string(),
            Scalar::UInt(v) => v.to_string(),
            Scalar::Str(s) => (*s).to_string(),
            Scalar::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
            Scalar::Enum(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Bool(v) => v.to_string(),
        }
    }

    /// Integer view for integer-kind fields. Unsigned values above
    /// `i64::MAX` have no integer view.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            Scalar::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }
}

/// The runtime value behind a [`FieldDescriptor`].
pub enum Value<'a> {
    Scalar(Scalar<'a>),
    Repeated(Vec<Scalar<'a>>),
    Message(&'a dyn Node),
    Messages(Vec<&'a dyn Node>),
    /// A singular field with nothing set.
    Unset,
}

/// Capability every walkable record tree provides.
pub trait Node {
    /// Field descriptors in declaration order.
    fn fields(&self) -> &[FieldDescriptor];

    /// The value for one of this node's own descriptors.
    fn get(&self, field: &FieldDescriptor) -> Value<'_>;

    /// Every field paired with its value, in declaration order.
    ///
    /// Walkers use this instead of calling [`get`](Node::get) per field.
    /// Bindings that store fields positionally should override it so a walk
    /// stays linear and duplicate descriptors keep their own values.
    fn entries(&self) -> Vec<(&FieldDescriptor, Value<'_>)> {
        self.fields().iter().map(|f| (f, self.get(f))).collect()
    }
}

// =============================================================================
// Owned tree binding
// =============================================================================

/// One stored datum of a [`Message`] field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Datum {
    Int(i64),
    UInt(u64),
    Str(String),
    Bytes(Vec<u8>),
    Enum(i32),
    Float(f64),
    Bool(bool),
    Message(Message),
}

impl Datum {
    fn as_scalar(&self) -> Option<Scalar<'_>> {
        Some(match self {
            Datum::Int(v) => Scalar::Int(*v),
            Datum::UInt(v) => Scalar::UInt(*v),
            Datum::Str(s) => Scalar::Str(s),
            Datum::Bytes(b) => Scalar::Bytes(b),
            Datum::Enum(v) => Scalar::Enum(*v),
            Datum::Float(v) => Scalar::Float(*v),
            Datum::Bool(v) => Scalar::Bool(*v),
            Datum::Message(_) => return None,
        })
    }

    fn as_node(&self) -> Option<&dyn Node> {
        match self {
            Datum::Message(m) => Some(m),
            _ => None,
        }
    }
}

/// A field of an owned [`Message`]: its descriptor plus stored data.
///
/// Singular fields hold zero (unset) or one datum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub descriptor: FieldDescriptor,
    #[serde(default)]
    pub data: Vec<Datum>,
}

/// Owned, serde-serializable record tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub fields: Vec<Field>,
    /// Descriptor list mirrored from `fields` so `Node::fields` can hand out
    /// a slice. Rebuilt on deserialize.
    #[serde(skip)]
    descriptors: Vec<FieldDescriptor>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit fields.
    pub fn from_fields(fields: Vec<Field>) -> Self {
        let descriptors = fields.iter().map(|f| f.descriptor.clone()).collect();
        Self {
            fields,
            descriptors,
        }
    }

    /// Restore the descriptor mirror after deserialization, recursively.
    pub(crate) fn reindex(&mut self) {
        self.descriptors = self.fields.iter().map(|f| f.descriptor.clone()).collect();
        for field in &mut self.fields {
            for datum in &mut field.data {
                if let Datum::Message(m) = datum {
                    m.reindex();
                }
            }
        }
    }

    /// Append a field with the given descriptor and data.
    pub fn with_field(
        mut self,
        name: &str,
        cardinality: Cardinality,
        kind: FieldKind,
        data: Vec<Datum>,
    ) -> Self {
        let descriptor = FieldDescriptor::new(name, cardinality, kind);
        self.descriptors.push(descriptor.clone());
        self.fields.push(Field { descriptor, data });
        self
    }

    pub fn with_string(self, name: &str, value: &str) -> Self {
        self.with_field(
            name,
            Cardinality::Singular,
            FieldKind::String,
            vec![Datum::Str(value.to_string())],
        )
    }

    pub fn with_strings(self, name: &str, values: &[&str]) -> Self {
        let data = values.iter().map(|v| Datum::Str(v.to_string())).collect();
        self.with_field(name, Cardinality::Repeated, FieldKind::String, data)
    }

    pub fn with_bytes(self, name: &str, value: Vec<u8>) -> Self {
        self.with_field(
            name,
            Cardinality::Singular,
            FieldKind::Bytes,
            vec![Datum::Bytes(value)],
        )
    }

    pub fn with_repeated_bytes(self, name: &str, values: Vec<Vec<u8>>) -> Self {
        let data = values.into_iter().map(Datum::Bytes).collect();
        self.with_field(name, Cardinality::Repeated, FieldKind::Bytes, data)
    }

    pub fn with_int(self, name: &str, value: i64) -> Self {
        self.with_field(
            name,
            Cardinality::Singular,
            FieldKind::SignedInt,
            vec![Datum::Int(value)],
        )
    }

    pub fn with_uint(self, name: &str, value: u64) -> Self {
        self.with_field(
            name,
            Cardinality::Singular,
            FieldKind::UnsignedInt,
            vec![Datum::UInt(value)],
        )
    }

    pub fn with_enum(self, name: &str, value: i32) -> Self {
        self.with_field(
            name,
            Cardinality::Singular,
            FieldKind::Enum,
            vec![Datum::Enum(value)],
        )
    }

    pub fn with_message(self, name: &str, value: Message) -> Self {
        self.with_field(
            name,
            Cardinality::Singular,
            FieldKind::Message,
            vec![Datum::Message(value)],
        )
    }

    pub fn with_messages(self, name: &str, values: Vec<Message>) -> Self {
        let data = values.into_iter().map(Datum::Message).collect();
        self.with_field(name, Cardinality::Repeated, FieldKind::Message, data)
    }
}

impl Field {
    fn value(&self) -> Value<'_> {
        match (self.descriptor.kind, self.descriptor.cardinality) {
            (FieldKind::Message, Cardinality::Singular) => self
                .data
                .first()
                .and_then(Datum::as_node)
                .map_or(Value::Unset, Value::Message),
            (FieldKind::Message, Cardinality::Repeated) => {
                Value::Messages(self.data.iter().filter_map(Datum::as_node).collect())
            }
            (_, Cardinality::Singular) => self
                .data
                .first()
                .and_then(Datum::as_scalar)
                .map_or(Value::Unset, Value::Scalar),
            (_, Cardinality::Repeated) => {
                Value::Repeated(self.data.iter().filter_map(Datum::as_scalar).collect())
            }
        }
    }
}

impl Node for Message {
    fn fields(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Value of the first field matching `field`.
    fn get(&self, field: &FieldDescriptor) -> Value<'_> {
        self.fields
            .iter()
            .find(|f| f.descriptor == *field)
            .map_or(Value::Unset, Field::value)
    }

    fn entries(&self) -> Vec<(&FieldDescriptor, Value<'_>)> {
        self.fields
            .iter()
            .map(|f| (&f.descriptor, f.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_declaration_order() {
        let msg = Message::new()
            .with_string("camera", "CAMERA_FRONT")
            .with_int("timestamp_us", 42)
            .with_bytes("image", vec![1, 2, 3]);
        let names: Vec<&str> = msg.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["camera", "timestamp_us", "image"]);
    }

    #[test]
    fn singular_scalar_reads_back() {
        let msg = Message::new().with_int("frame_index", -7);
        let field = msg.fields()[0].clone();
        assert!(matches!(msg.get(&field), Value::Scalar(Scalar::Int(-7))));
    }

    #[test]
    fn repeated_messages_expose_each_element() {
        let msg = Message::new().with_messages(
            "images",
            vec![Message::new(), Message::new(), Message::new()],
        );
        let field = msg.fields()[0].clone();
        match msg.get(&field) {
            Value::Messages(children) => assert_eq!(children.len(), 3),
            _ => panic!("expected repeated messages"),
        }
    }

    #[test]
    fn empty_singular_field_is_unset() {
        let msg = Message::new().with_field(
            "pose",
            Cardinality::Singular,
            FieldKind::Message,
            Vec::new(),
        );
        let field = msg.fields()[0].clone();
        assert!(matches!(msg.get(&field), Value::Unset));
    }

    #[test]
    fn unknown_descriptor_is_unset() {
        let msg = Message::new().with_int("a", 1);
        let foreign = FieldDescriptor::new("b", Cardinality::Singular, FieldKind::SignedInt);
        assert!(matches!(msg.get(&foreign), Value::Unset));
    }

    #[test]
    fn mismatched_datum_in_message_field_is_dropped() {
        let msg = Message::new().with_field(
            "pose",
            Cardinality::Repeated,
            FieldKind::Message,
            vec![Datum::Int(3), Datum::Message(Message::new())],
        );
        let field = msg.fields()[0].clone();
        match msg.get(&field) {
            Value::Messages(children) => assert_eq!(children.len(), 1),
            _ => panic!("expected repeated messages"),
        }
    }

    #[test]
    fn duplicate_descriptors_keep_their_own_entries() {
        let msg = Message::new()
            .with_string("camera", "CAM_1")
            .with_string("camera", "CAM_2");
        let labels: Vec<String> = msg
            .entries()
            .into_iter()
            .map(|(_, value)| match value {
                Value::Scalar(s) => s.to_label(),
                _ => panic!("expected scalar"),
            })
            .collect();
        assert_eq!(labels, vec!["CAM_1", "CAM_2"]);
    }

    #[test]
    fn entries_match_get_for_distinct_fields() {
        let msg = Message::new()
            .with_int("a", 1)
            .with_uint("b", 2)
            .with_field("c", Cardinality::Singular, FieldKind::Bytes, Vec::new());
        for (field, value) in msg.entries() {
            let direct = msg.get(field);
            match (value, direct) {
                (Value::Scalar(x), Value::Scalar(y)) => assert_eq!(x, y),
                (Value::Unset, Value::Unset) => {}
                _ => panic!("entries and get disagree on {}", field.name),
            }
        }
    }

    #[test]
    fn json_round_trip_restores_descriptors() {
        let msg = Message::new()
            .with_string("segment_id", "seg-1")
            .with_message("inner", Message::new().with_uint("time_us", 5));
        let json = serde_json::to_vec(&msg).unwrap();
        let mut back: Message = serde_json::from_slice(&json).unwrap();
        assert!(back.fields().is_empty());
        back.reindex();
        assert_eq!(back, msg);
        assert_eq!(back.fields().len(), 2);
    }

    #[test]
    fn labels_stringify_by_value() {
        assert_eq!(Scalar::Str("CAMERA_REAR").to_label(), "CAMERA_REAR");
        assert_eq!(Scalar::Enum(3).to_label(), "3");
        assert_eq!(Scalar::Int(-2).to_label(), "-2");
        assert_eq!(Scalar::Bool(true).to_label(), "true");
    }

    #[test]
    fn uint_above_i64_has_no_integer_view() {
        assert_eq!(Scalar::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Scalar::UInt(12).as_i64(), Some(12));
        assert_eq!(Scalar::Str("12").as_i64(), None);
    }
}
