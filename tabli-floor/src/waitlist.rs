use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabli_core::booking::SeatingPreference;
use tabli_core::Contact;
use uuid::Uuid;

/// A party waiting for a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: Uuid,
    pub customer_name: String,
    pub party_size: u8,
    pub contact: Contact,
    #[serde(default)]
    pub seating: SeatingPreference,
    pub joined_at: DateTime<Utc>,
    /// When staff told the party their table is ready
    #[serde(default)]
    pub notified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub held_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reminder_sent: bool,
}

impl QueueEntry {
    pub fn new(customer_name: String, party_size: u8, contact: Contact, seating: SeatingPreference, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_name,
            party_size,
            contact,
            seating,
            joined_at: now,
            notified_at: None,
            held_until: None,
            reminder_sent: false,
        }
    }

    pub fn is_called(&self) -> bool {
        self.notified_at.is_some()
    }

    pub fn hold_expired(&self, now: DateTime<Utc>) -> bool {
        self.held_until.is_some_and(|until| until <= now)
    }

    /// Time left on the hold, `None` when the party has not been called.
    pub fn hold_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.held_until.map(|until| (until - now).max(Duration::zero()))
    }

    pub fn waited(&self, now: DateTime<Utc>) -> Duration {
        (now - self.joined_at).max(Duration::zero())
    }
}

/// How an entry left the queue. Every outcome is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueOutcome {
    Seated,
    NoShow,
    Removed,
}

/// An entry that has left the queue, with the 1-based position it held.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub entry: QueueEntry,
    pub outcome: QueueOutcome,
    pub position: u32,
}

/// A hold reminder that is due.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldReminder {
    pub entry_id: Uuid,
    pub contact: Contact,
    pub minutes_remaining: u32,
}

/// FIFO of waiting parties. Departed entries are dropped, never re-queued.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Waitlist {
    entries: Vec<QueueEntry>,
}

impl Waitlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, entry_id: &Uuid) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.id == *entry_id)
    }

    /// 1-based position in line.
    pub fn position(&self, entry_id: &Uuid) -> Option<u32> {
        self.index_of(entry_id).map(|i| i as u32 + 1)
    }

    /// Append a party; returns the new entry and its position.
    pub fn join(
        &mut self,
        customer_name: String,
        party_size: u8,
        contact: Contact,
        seating: SeatingPreference,
        now: DateTime<Utc>,
    ) -> (&QueueEntry, u32) {
        self.entries.push(QueueEntry::new(customer_name, party_size, contact, seating, now));
        let position = self.entries.len() as u32;
        (&self.entries[self.entries.len() - 1], position)
    }

    /// Restore an entry as-is, e.g. from seed data.
    pub fn restore(&mut self, entry: QueueEntry) -> Result<(), WaitlistError> {
        if self.get(&entry.id).is_some() {
            return Err(WaitlistError::Duplicate(entry.id));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Transition: Waiting → Called. Picks the earliest party not yet called
    /// and starts its hold.
    pub fn call_next(&mut self, hold: Duration, now: DateTime<Utc>) -> Result<&QueueEntry, WaitlistError> {
        if self.entries.is_empty() {
            return Err(WaitlistError::Empty);
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| !e.is_called())
            .ok_or(WaitlistError::AllCalled)?;

        entry.notified_at = Some(now);
        entry.held_until = Some(now + hold);
        entry.reminder_sent = false;
        Ok(entry)
    }

    pub fn seat(&mut self, entry_id: &Uuid) -> Result<Departure, WaitlistError> {
        self.depart(entry_id, QueueOutcome::Seated)
    }

    pub fn mark_no_show(&mut self, entry_id: &Uuid) -> Result<Departure, WaitlistError> {
        self.depart(entry_id, QueueOutcome::NoShow)
    }

    pub fn remove(&mut self, entry_id: &Uuid) -> Result<Departure, WaitlistError> {
        self.depart(entry_id, QueueOutcome::Removed)
    }

    fn depart(&mut self, entry_id: &Uuid, outcome: QueueOutcome) -> Result<Departure, WaitlistError> {
        let index = self.index_of(entry_id).ok_or(WaitlistError::NotFound(*entry_id))?;
        let entry = self.entries.remove(index);
        Ok(Departure {
            entry,
            outcome,
            position: index as u32 + 1,
        })
    }

    /// Drop every party whose hold has lapsed, as no-shows.
    pub fn expire_holds(&mut self, now: DateTime<Utc>) -> Vec<Departure> {
        let expired: Vec<Uuid> = self
            .entries
            .iter()
            .filter(|e| e.hold_expired(now))
            .map(|e| e.id)
            .collect();

        expired
            .iter()
            .filter_map(|id| self.mark_no_show(id).ok())
            .collect()
    }

    /// Holds with at most `threshold` left that have not been reminded yet.
    /// Each entry is reminded once per hold.
    pub fn due_reminders(&mut self, now: DateTime<Utc>, threshold: Duration) -> Vec<HoldReminder> {
        self.entries
            .iter_mut()
            .filter(|e| !e.reminder_sent && !e.hold_expired(now))
            .filter_map(|e| {
                let remaining = e.hold_remaining(now)?;
                if remaining > threshold {
                    return None;
                }
                e.reminder_sent = true;
                Some(HoldReminder {
                    entry_id: e.id,
                    contact: e.contact.clone(),
                    // Round up so a reminder never says "0 minutes"
                    minutes_remaining: ((remaining.num_seconds() + 59) / 60) as u32,
                })
            })
            .collect()
    }

    /// Entries at or behind `position` (1-based), with their current positions.
    pub fn behind(&self, position: u32) -> impl Iterator<Item = (u32, &QueueEntry)> {
        let start = position.saturating_sub(1) as usize;
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, e)| (i as u32 + 1, e))
    }

    pub fn waiting_guests(&self) -> u32 {
        self.entries.iter().map(|e| e.party_size as u32).sum()
    }

    fn index_of(&self, entry_id: &Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.id == *entry_id)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WaitlistError {
    #[error("Queue entry not found: {0}")]
    NotFound(Uuid),

    #[error("Queue entry already exists: {0}")]
    Duplicate(Uuid),

    #[error("The waitlist is empty")]
    Empty,

    #[error("Every waiting party has already been called")]
    AllCalled,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(list: &mut Waitlist, name: &str, size: u8, now: DateTime<Utc>) -> Uuid {
        list.join(name.to_string(), size, Contact::phone("(555) 123-4567"), SeatingPreference::default(), now)
            .0
            .id
    }

    #[test]
    fn test_restore_rejects_duplicate_entry() {
        let mut list = Waitlist::new();
        let entry = QueueEntry::new("Mike Chen".to_string(), 2, Contact::phone("(555) 234-5678"), SeatingPreference::default(), Utc::now());

        list.restore(entry.clone()).unwrap();
        assert_eq!(list.restore(entry.clone()), Err(WaitlistError::Duplicate(entry.id)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_queue_lifecycle() {
        let mut list = Waitlist::new();
        let now = Utc::now();

        let sarah = party(&mut list, "Sarah Johnson", 4, now);
        let mike = party(&mut list, "Mike Chen", 2, now);
        let emily = party(&mut list, "Emily Rodriguez", 6, now);
        assert_eq!(list.position(&emily), Some(3));
        assert_eq!(list.waiting_guests(), 12);

        // Waiting → Seated
        let seated = list.seat(&sarah).unwrap();
        assert_eq!(seated.outcome, QueueOutcome::Seated);
        assert_eq!(seated.position, 1);
        assert_eq!(list.position(&mike), Some(1));

        // Waiting → NoShow
        assert_eq!(list.mark_no_show(&mike).unwrap().outcome, QueueOutcome::NoShow);
        // Waiting → Removed
        assert_eq!(list.remove(&emily).unwrap().outcome, QueueOutcome::Removed);
        assert!(list.is_empty());
    }

    #[test]
    fn test_departed_entries_are_terminal() {
        let mut list = Waitlist::new();
        let id = party(&mut list, "David Kim", 3, Utc::now());
        list.remove(&id).unwrap();

        assert_eq!(list.seat(&id).unwrap_err(), WaitlistError::NotFound(id));
        assert_eq!(list.mark_no_show(&id).unwrap_err(), WaitlistError::NotFound(id));
        assert!(list.get(&id).is_none());
    }

    #[test]
    fn test_call_next_walks_the_queue() {
        let mut list = Waitlist::new();
        let now = Utc::now();
        assert_eq!(list.call_next(Duration::minutes(10), now).unwrap_err(), WaitlistError::Empty);

        let first = party(&mut list, "Lisa Park", 2, now);
        let second = party(&mut list, "Mike Chen", 2, now);

        let called = list.call_next(Duration::minutes(10), now).unwrap();
        assert_eq!(called.id, first);
        assert_eq!(called.held_until, Some(now + Duration::minutes(10)));

        assert_eq!(list.call_next(Duration::minutes(10), now).unwrap().id, second);
        assert_eq!(list.call_next(Duration::minutes(10), now).unwrap_err(), WaitlistError::AllCalled);
    }

    #[test]
    fn test_expired_holds_become_no_shows() {
        let mut list = Waitlist::new();
        let now = Utc::now();
        let first = party(&mut list, "Sarah Johnson", 4, now);
        let second = party(&mut list, "Mike Chen", 2, now);
        list.call_next(Duration::minutes(10), now).unwrap();

        assert!(list.expire_holds(now + Duration::minutes(9)).is_empty());

        let expired = list.expire_holds(now + Duration::minutes(10));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].entry.id, first);
        assert_eq!(expired[0].outcome, QueueOutcome::NoShow);
        assert_eq!(list.position(&second), Some(1));
    }

    #[test]
    fn test_reminder_sent_once() {
        let mut list = Waitlist::new();
        let now = Utc::now();
        let id = party(&mut list, "Emily Rodriguez", 6, now);
        list.call_next(Duration::minutes(10), now).unwrap();

        let threshold = Duration::minutes(3);
        assert!(list.due_reminders(now + Duration::minutes(5), threshold).is_empty());

        let due = list.due_reminders(now + Duration::seconds(7 * 60 + 30), threshold);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].entry_id, id);
        assert_eq!(due[0].minutes_remaining, 3);

        assert!(list.due_reminders(now + Duration::minutes(8), threshold).is_empty());
    }

    #[test]
    fn test_behind_reports_shifted_positions() {
        let mut list = Waitlist::new();
        let now = Utc::now();
        let ids: Vec<Uuid> = ["A", "B", "C", "D"].iter().map(|n| party(&mut list, n, 2, now)).collect();

        let gone = list.remove(&ids[1]).unwrap();
        let moved: Vec<(u32, Uuid)> = list.behind(gone.position).map(|(p, e)| (p, e.id)).collect();
        assert_eq!(moved, vec![(2, ids[2]), (3, ids[3])]);
    }
}
