use serde_json::Value;

/// Known property paths that carry content, in no particular order.
///
/// Precedence lives in [`PayloadShape::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    PayloadContent,
    Content,
    PayloadMessage,
    Message,
    PayloadText,
    Text,
    DataChunk,
    PayloadDataChunk,
}

impl FieldPath {
    pub fn segments(self) -> &'static [&'static str] {
        match self {
            FieldPath::PayloadContent => &["payload", "content"],
            FieldPath::Content => &["content"],
            FieldPath::PayloadMessage => &["payload", "message"],
            FieldPath::Message => &["message"],
            FieldPath::PayloadText => &["payload", "text"],
            FieldPath::Text => &["text"],
            FieldPath::DataChunk => &["dataChunk", "chunk", "content"],
            FieldPath::PayloadDataChunk => &["payload", "dataChunk", "chunk", "content"],
        }
    }
}

const LEADING_FIELDS: [FieldPath; 6] = [
    FieldPath::PayloadContent,
    FieldPath::Content,
    FieldPath::PayloadMessage,
    FieldPath::Message,
    FieldPath::PayloadText,
    FieldPath::Text,
];

const CHUNK_FIELDS: [FieldPath; 2] = [FieldPath::DataChunk, FieldPath::PayloadDataChunk];

/// Keys probed at every node of the nested fallback search, in priority order.
const NESTED_KEYS: [&str; 4] = ["content", "message", "text", "data"];

/// The recognised shapes of an incoming event payload.
///
/// Parsing a payload into this type fixes which rule produces its content;
/// [`PayloadShape::fragment`] is then an exhaustive match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadShape<'a> {
    /// Null, `false`, zero, empty strings and other scalars without text.
    Empty,
    /// The payload is a string.
    Text(&'a str),
    /// `{ "payload": "<non-empty string>" }`.
    WrappedText(&'a str),
    /// A value found on one of the known content paths.
    Field { path: FieldPath, value: &'a Value },
    /// `payload.data`: either a string or an object with `content`.
    WrappedData(&'a Value),
    /// `payload` is an object or array with no recognised field; serialized as-is.
    Opaque(&'a Value),
    /// Unknown object or array; searched depth-first for a text field.
    Nested(&'a Value),
}

impl<'a> PayloadShape<'a> {
    pub fn classify(payload: &'a Value) -> Self {
        if is_falsy(payload) {
            return PayloadShape::Empty;
        }
        match payload {
            Value::String(text) => return PayloadShape::Text(text),
            Value::Object(_) | Value::Array(_) => {}
            _ => return PayloadShape::Empty,
        }

        if let Some(Value::String(text)) = payload.get("payload") {
            if !text.is_empty() {
                return PayloadShape::WrappedText(text);
            }
        }
        for path in LEADING_FIELDS {
            if let Some(value) = lookup(payload, path.segments()) {
                return PayloadShape::Field { path, value };
            }
        }
        if let Some(data) = lookup(payload, &["payload", "data"]) {
            return PayloadShape::WrappedData(data);
        }
        for path in CHUNK_FIELDS {
            if let Some(value) = lookup(payload, path.segments()) {
                return PayloadShape::Field { path, value };
            }
        }
        match payload.get("payload") {
            Some(inner) if inner.is_object() || inner.is_array() => PayloadShape::Opaque(inner),
            _ => PayloadShape::Nested(payload),
        }
    }

    /// Text carried by this shape; empty when there is none.
    pub fn fragment(&self) -> String {
        match self {
            PayloadShape::Empty => String::new(),
            PayloadShape::Text(text) | PayloadShape::WrappedText(text) => (*text).to_owned(),
            PayloadShape::Field { value, .. } => render(value),
            PayloadShape::WrappedData(Value::String(text)) => text.clone(),
            PayloadShape::WrappedData(data) => lookup(data, &["content"])
                .map(render)
                .unwrap_or_default(),
            PayloadShape::Opaque(inner) => serde_json::to_string(inner).unwrap_or_default(),
            PayloadShape::Nested(root) => search(root).unwrap_or_default().to_owned(),
        }
    }
}

/// Best-guess text content of an arbitrarily shaped payload.
///
/// Never fails: payloads without recognisable content give an empty string.
pub fn extract_content(payload: &Value) -> String {
    PayloadShape::classify(payload).fragment()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Follows `segments` through nested objects. JSON `null` counts as absent.
fn lookup<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |node, key| node.get(*key))
        .filter(|value| !value.is_null())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        // Float `Display` drops the `.0` of integral values, so `1.0` reads as `1`.
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => float.to_string(),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

/// Depth-first search for the first string under one of [`NESTED_KEYS`].
///
/// Sibling keys are visited in lexicographic order so repeated runs agree.
/// A node whose own key holds an empty string yields `Some("")`; the parent
/// then keeps looking at the remaining siblings.
fn search(node: &Value) -> Option<&str> {
    match node {
        Value::Object(map) => {
            for key in NESTED_KEYS {
                if let Some(Value::String(text)) = map.get(key) {
                    return Some(text);
                }
            }
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|left, right| left.0.cmp(right.0));
            entries
                .into_iter()
                .find_map(|(_, child)| search(child).filter(|text| !text.is_empty()))
        }
        Value::Array(items) => items
            .iter()
            .find_map(|child| search(child).filter(|text| !text.is_empty())),
        _ => None,
    }
}
