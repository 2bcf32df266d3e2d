use crate::record::{text_field, Record};
use crate::storage::RecordStore;

/// First member whose `passenger_id` equals `passenger_id`.
pub async fn find_by_passenger(store: &RecordStore, passenger_id: &str) -> Option<Record> {
    store
        .find_first(|member| text_field(member, "passenger_id").as_deref() == Some(passenger_id))
        .await
}

/// Member by primary key, else by a matching `member_id` or
/// `frequent_flyer_number` field.
pub async fn find_by_member(store: &RecordStore, member_id: &str) -> Option<Record> {
    if let Some(member) = store.get_by_id(member_id).await {
        return Some(member);
    }
    store
        .find_first(|member| {
            ["member_id", "frequent_flyer_number"]
                .iter()
                .any(|field| text_field(member, field).as_deref() == Some(member_id))
        })
        .await
}
