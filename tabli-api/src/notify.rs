//! Customer notifications sent after a floor change has been committed.

use tabli_core::notification::{notify_queue_position, notify_table_ready, DeliveryReceipt};
use tabli_core::Contact;
use tabli_floor::QueueUpdate;

use crate::state::AppState;

/// Tell a called or seated party their table is ready. Awaited, so the
/// staff response carries the receipts.
pub async fn table_ready(state: &AppState, contact: &Contact, restaurant_name: &str, hold_minutes: u32) -> Vec<DeliveryReceipt> {
    notify_table_ready(state.notifier.as_ref(), contact, restaurant_name, hold_minutes).await
}

/// Position updates for everyone who moved up. Sent in the background.
pub fn queue_moved(state: &AppState, restaurant_name: String, updates: Vec<QueueUpdate>) {
    if updates.is_empty() {
        return;
    }
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        for update in updates {
            notify_queue_position(
                notifier.as_ref(),
                &update.contact,
                &restaurant_name,
                update.position,
                update.estimated_wait,
            )
            .await;
        }
    });
}
