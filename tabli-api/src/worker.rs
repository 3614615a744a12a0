use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tabli_core::notification::send_hold_reminder;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

use crate::{notify, state::AppState};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub expired: usize,
    pub reminders: usize,
}

/// Periodically expire lapsed holds and send hold reminders.
pub fn start_hold_sweeper(state: AppState) -> JoinHandle<()> {
    let period = Duration::from_secs(state.floor.hold_sweep_seconds.max(1));
    info!("Hold sweeper started, running every {:?}", period);

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let report = sweep_holds(&state, Utc::now()).await;
            if report != SweepReport::default() {
                info!(expired = report.expired, reminders = report.reminders, "Hold sweep");
            } else {
                debug!("Hold sweep: nothing to do");
            }
        }
    })
}

pub async fn sweep_holds(state: &AppState, now: DateTime<Utc>) -> SweepReport {
    let threshold = ChronoDuration::minutes(state.floor.reminder_minutes as i64);
    let sweeps = state
        .directory
        .update_all(|r| (r.profile.name.clone(), r.sweep_holds(now, threshold)))
        .await;

    let mut report = SweepReport::default();
    for (restaurant_id, (name, sweep)) in sweeps {
        if sweep.is_empty() {
            continue;
        }
        for departure in &sweep.expired {
            info!(
                restaurant_id,
                entry_id = %departure.entry.id,
                "Hold expired, party marked as no-show"
            );
        }
        for reminder in &sweep.reminders {
            send_hold_reminder(state.notifier.as_ref(), &reminder.contact, &name, reminder.minutes_remaining).await;
        }
        report.expired += sweep.expired.len();
        report.reminders += sweep.reminders.len();
        notify::queue_moved(state, name, sweep.updates);
    }
    report
}
