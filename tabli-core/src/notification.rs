use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::contact::{Contact, ContactMethod};
use crate::wait::WaitBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Sms,
    Call,
    Email,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub to: String,
    pub message: String,
    pub channel: Channel,
    pub restaurant_name: Option<String>,
    pub queue_position: Option<u32>,
    pub estimated_wait: Option<WaitBand>,
}

impl Notification {
    pub fn new(to: &str, channel: Channel, message: String, restaurant_name: &str) -> Self {
        Self {
            to: to.to_string(),
            message,
            channel,
            restaurant_name: Some(restaurant_name.to_string()),
            queue_position: None,
            estimated_wait: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReceipt {
    pub id: Uuid,
    pub channel: Channel,
    pub sent_at: DateTime<Utc>,
}

/// Front for an SMS / voice / email gateway.
///
/// Delivery is fire-and-forget from the caller's point of view, so the
/// contract has no failure path: an implementation backed by a real provider
/// is expected to log and absorb transport errors itself.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, notification: Notification) -> DeliveryReceipt;
}

/// Stand-in gateway: waits a fixed delay, logs, keeps an outbox.
pub struct SimulatedDispatcher {
    delay: Duration,
    outbox: Mutex<Vec<Notification>>,
}

impl SimulatedDispatcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            outbox: Mutex::new(Vec::new()),
        }
    }

    /// Everything dispatched so far, oldest first.
    pub async fn sent(&self) -> Vec<Notification> {
        self.outbox.lock().await.clone()
    }
}

impl Default for SimulatedDispatcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl NotificationDispatcher for SimulatedDispatcher {
    async fn dispatch(&self, notification: Notification) -> DeliveryReceipt {
        tokio::time::sleep(self.delay).await;

        let receipt = DeliveryReceipt {
            id: Uuid::new_v4(),
            channel: notification.channel,
            sent_at: Utc::now(),
        };

        tracing::info!(
            channel = ?notification.channel,
            to = %tabli_shared::Masked(notification.to.as_str()),
            restaurant = ?notification.restaurant_name,
            message = %notification.message,
            "Simulated notification sent"
        );

        self.outbox.lock().await.push(notification);
        receipt
    }
}

/// Phone contacts get an SMS followed by an automated call, email contacts an email.
pub async fn notify_table_ready(
    dispatcher: &dyn NotificationDispatcher,
    contact: &Contact,
    restaurant_name: &str,
    hold_minutes: u32,
) -> Vec<DeliveryReceipt> {
    let message = format!(
        "Your table at {} is ready! Please arrive within {} minutes to secure your reservation.",
        restaurant_name, hold_minutes
    );

    match contact.method {
        ContactMethod::Phone => {
            let sms = dispatcher
                .dispatch(Notification::new(&contact.value, Channel::Sms, message, restaurant_name))
                .await;
            let call_message = format!(
                "This is an automated call from {}. Your table is now ready.",
                restaurant_name
            );
            let call = dispatcher
                .dispatch(Notification::new(&contact.value, Channel::Call, call_message, restaurant_name))
                .await;
            vec![sms, call]
        }
        ContactMethod::Email => {
            let email = dispatcher
                .dispatch(Notification::new(&contact.value, Channel::Email, message, restaurant_name))
                .await;
            vec![email]
        }
    }
}

pub async fn notify_queue_position(
    dispatcher: &dyn NotificationDispatcher,
    contact: &Contact,
    restaurant_name: &str,
    position: u32,
    estimated_wait: WaitBand,
) -> DeliveryReceipt {
    let message = format!(
        "Update from {}: You're now #{} in line. Estimated wait: {}.",
        restaurant_name, position, estimated_wait
    );
    let mut notification = Notification::new(&contact.value, text_channel(contact), message, restaurant_name);
    notification.queue_position = Some(position);
    notification.estimated_wait = Some(estimated_wait);

    dispatcher.dispatch(notification).await
}

pub async fn send_hold_reminder(
    dispatcher: &dyn NotificationDispatcher,
    contact: &Contact,
    restaurant_name: &str,
    minutes_remaining: u32,
) -> DeliveryReceipt {
    let message = format!(
        "Reminder: Your table at {} will only be held for {} more minutes. Please confirm you're on your way!",
        restaurant_name, minutes_remaining
    );
    dispatcher
        .dispatch(Notification::new(&contact.value, text_channel(contact), message, restaurant_name))
        .await
}

fn text_channel(contact: &Contact) -> Channel {
    match contact.method {
        ContactMethod::Phone => Channel::Sms,
        ContactMethod::Email => Channel::Email,
    }
}
