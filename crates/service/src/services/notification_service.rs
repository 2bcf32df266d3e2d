use serde_json::{Map, Value};
use tracing::info;

use crate::record::{scalar_text, text_field, Record};
use crate::storage::RecordStore;

pub const TEMPLATES_KEY: &str = "templates";
pub const HISTORY_KEY: &str = "history";

const DEFAULT_SUBJECT: &str = "Notification";
const UNKNOWN_RECIPIENT: &str = "unknown";

/// Substitute `{booking_id}` and `{bag_tag}` in a template body.
pub fn render_template(body: &str, booking_id: Option<&str>, bag_tag: Option<&str>) -> String {
    body.replace("{booking_id}", booking_id.unwrap_or(""))
        .replace("{bag_tag}", bag_tag.unwrap_or(""))
}

/// Render the template for `input.type` and append the result to the
/// recipient's history.
pub async fn send(store: &RecordStore, input: &Record) -> Record {
    let field = |name: &str| input.get(name).cloned().unwrap_or(Value::Null);
    let kind = field("type");
    let recipient = field("recipient");
    let booking_id = field("booking_id");
    let bag_tag = field("bag_tag");

    let history_key = text_field(input, "recipient").unwrap_or_else(|| UNKNOWN_RECIPIENT.to_string());

    store
        .update_map(|data| {
            let template = scalar_text(&kind)
                .and_then(|k| data.raw.get(TEMPLATES_KEY).and_then(|t| t.get(k.as_str())))
                .cloned()
                .unwrap_or(Value::Null);
            let subject = template.get("subject").and_then(Value::as_str).unwrap_or(DEFAULT_SUBJECT);
            let body_template = template.get("body").and_then(Value::as_str).unwrap_or("");
            let body = render_template(
                body_template,
                scalar_text(&booking_id).as_deref(),
                scalar_text(&bag_tag).as_deref(),
            );

            let mut result = Record::new();
            result.insert("type".into(), kind.clone());
            result.insert("recipient".into(), recipient.clone());
            result.insert("subject".into(), Value::String(subject.to_string()));
            result.insert("body".into(), Value::String(body));
            result.insert("booking_id".into(), booking_id.clone());
            result.insert("bag_tag".into(), bag_tag.clone());

            let history = data
                .raw
                .entry(HISTORY_KEY)
                .or_insert_with(|| Value::Object(Map::new()));
            if !history.is_object() {
                *history = Value::Object(Map::new());
            }
            if let Value::Object(history) = history {
                let list = history.entry(history_key.clone()).or_insert_with(|| Value::Array(Vec::new()));
                if !list.is_array() {
                    *list = Value::Array(Vec::new());
                }
                if let Value::Array(list) = list {
                    list.push(Value::Object(result.clone()));
                }
            }
            info!(recipient = %history_key, "notification sent");
            result
        })
        .await
}

/// Notifications sent to `recipient_id`, oldest first.
pub async fn history(store: &RecordStore, recipient_id: &str) -> Vec<Value> {
    store
        .read_map(|data| {
            data.raw
                .get(HISTORY_KEY)
                .and_then(|h| h.get(recipient_id))
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        })
        .await
}
