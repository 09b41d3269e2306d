//! Schema Normalizer
//!
//! Maps whatever JSON the hot-list provider returned into an [`Envelope`].
//! Normalization is total: malformed input yields a failure envelope, never a
//! panic or an error.
//!
//! Recognized keys: `code`, `message`, `title`, `subtitle`, `data`. Inside
//! `data`, each element keeps `title`, `url`, `hot`, `img`, `mobileUrl`, `desc`.
//! Elements without a usable title are dropped.

use serde_json::{Map, Value};
use tracing::debug;

use crate::envelope::{Envelope, HotValue, Item, FAILURE_CODE};

const MALFORMED_RESPONSE: &str = "上游返回的数据格式无效";
const MISSING_CODE: &str = "上游返回的数据缺少状态码";

/// Normalize a raw upstream payload into an envelope
pub fn normalize(raw: &Value) -> Envelope {
    let Some(object) = raw.as_object() else {
        debug!("Upstream payload is not an object, treating as failure");
        return Envelope::failure(FAILURE_CODE, MALFORMED_RESPONSE);
    };

    let (code, fallback_message) = match object.get("code").and_then(as_code) {
        Some(code) => (code, None),
        None => (FAILURE_CODE, Some(MISSING_CODE)),
    };

    let mut envelope = Envelope::new(code);

    if let Some(message) = text_field(object, "message").or(fallback_message.map(String::from)) {
        envelope = envelope.with_message(message);
    }
    if let Some(title) = text_field(object, "title") {
        envelope = envelope.with_title(title);
    }
    if let Some(subtitle) = text_field(object, "subtitle") {
        envelope = envelope.with_subtitle(subtitle);
    }

    if let Some(Value::Array(elements)) = object.get("data") {
        let items: Vec<Item> = elements.iter().filter_map(normalize_item).collect();
        let dropped = elements.len() - items.len();
        if dropped > 0 {
            debug!(dropped, kept = items.len(), "Dropped upstream items without a title");
        }
        envelope = envelope.with_items(items);
    }

    envelope
}

/// Normalize one list element. Returns `None` when the element has no title.
pub fn normalize_item(raw: &Value) -> Option<Item> {
    let object = raw.as_object()?;
    let title = scalar_text(object.get("title")?)?;

    let mut item = Item::new(title);
    if let Some(url) = string_field(object, "url") {
        item = item.with_url(url);
    }
    if let Some(hot) = object.get("hot").and_then(as_hot) {
        item = item.with_hot(hot);
    }
    if let Some(img) = string_field(object, "img") {
        item = item.with_img(img);
    }
    if let Some(mobile_url) = string_field(object, "mobileUrl") {
        item = item.with_mobile_url(mobile_url);
    }
    if let Some(desc) = string_field(object, "desc") {
        item = item.with_desc(desc);
    }
    Some(item)
}

fn as_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_hot(value: &Value) -> Option<HotValue> {
    match value {
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => HotValue::Number(i),
            None => HotValue::Text(n.to_string()),
        }),
        Value::String(s) => Some(HotValue::Text(s.clone())),
        _ => None,
    }
}

/// Strings and numbers both read as text (some providers send numeric titles)
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(scalar_text)
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(String::from)
}
