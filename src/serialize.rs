use serde_json::{Number, Value};

use crate::db::{Document, ID_FIELD};

/// Reshapes a stored product for API output.
///
/// `_id` becomes a string `id`; `price` is coerced to a float when possible
/// and otherwise left as stored. Every other field passes through.
pub fn serialize_product(mut doc: Document) -> Document {
    if doc.is_empty() {
        return doc;
    }

    if let Some(raw) = doc.remove(ID_FIELD) {
        if raw.is_null() {
            doc.insert(ID_FIELD.to_string(), raw);
        } else {
            doc.insert("id".to_string(), Value::String(id_text(raw)));
        }
    }

    if let Some(price) = doc.get_mut("price") {
        if let Some(coerced) = coerce_float(price) {
            *price = coerced;
        }
    }

    doc
}

fn id_text(raw: Value) -> String {
    match raw {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn coerce_float(value: &Value) -> Option<Value> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    // NaN and infinities have no JSON form.
    Number::from_f64(f).map(Value::Number)
}
