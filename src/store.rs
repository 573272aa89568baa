//! Live-subscription façade over the habit and account collections.
//!
//! Every UI surface reads one subscription stream per user session instead of
//! querying on its own; only the stores initiate writes. Deliveries carry the
//! full current set, newest first, and remain the single source of truth:
//! after every write the store re-fetches and broadcasts, and the optimistic
//! archive update is reconciled against a fresh fetch when the write fails.
//! Dropping (or cancelling) a subscription releases its receiver; container
//! teardown is expected to do exactly that.

use crate::{
    core::habit as habit_ops,
    entities::{habit, user_account},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tokio::sync::{RwLock, watch};
use tracing::{debug, warn};

/// Handle to a user's live habit-list stream.
///
/// `current` reads the latest delivery; `changed` suspends until the next
/// one. When the owning store goes away `changed` returns an error and the
/// consumer must re-subscribe.
pub struct HabitSubscription {
    rx: watch::Receiver<Vec<habit::Model>>,
}

impl HabitSubscription {
    /// Latest delivered active-habit list, newest first.
    #[must_use]
    pub fn current(&self) -> Vec<habit::Model> {
        self.rx.borrow().clone()
    }

    /// Waits for the next delivery.
    pub async fn changed(&mut self) -> Result<()> {
        self.rx.changed().await.map_err(|_| Error::Storage {
            message: "habit subscription terminated".to_string(),
        })
    }

    /// Explicitly ends delivery on this handle.
    pub fn cancel(self) {}
}

/// CRUD plus live subscriptions over the habit collection.
pub struct HabitStore {
    db: DatabaseConnection,
    channels: RwLock<HashMap<String, watch::Sender<Vec<habit::Model>>>>,
}

impl HabitStore {
    /// Creates a store over an established database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribes to a user's active habit list.
    ///
    /// Safe to call repeatedly: every subscription for a user shares one
    /// sender, so re-subscribing hands out a fresh receiver seeing the
    /// current list. Handles already delivering are not woken unless the
    /// stored list actually changed underneath the channel.
    pub async fn subscribe(&self, user_id: &str) -> Result<HabitSubscription> {
        let list = habit_ops::get_active_habits(&self.db, user_id).await?;

        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(user_id.to_string())
            .or_insert_with(|| watch::channel(list.clone()).0);
        if *sender.borrow() != list {
            sender.send_replace(list);
        }

        Ok(HabitSubscription {
            rx: sender.subscribe(),
        })
    }

    /// Re-fetches a user's active list and pushes it to subscribers. A
    /// channel whose last receiver has dropped is evicted instead, so the
    /// per-user map does not grow without bound over a process lifetime.
    async fn broadcast(&self, user_id: &str) -> Result<()> {
        let list = habit_ops::get_active_habits(&self.db, user_id).await?;
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(user_id) {
            if sender.receiver_count() == 0 {
                channels.remove(user_id);
            } else {
                debug!("delivering {} habits to {user_id}", list.len());
                sender.send_replace(list);
            }
        }
        Ok(())
    }

    /// Upserts a habit and refreshes the owner's stream.
    pub async fn save(&self, habit: &habit::Model) -> Result<habit::Model> {
        let saved = habit_ops::save_habit(&self.db, habit).await?;
        self.broadcast(&saved.user_id).await?;
        Ok(saved)
    }

    /// Archives a habit with an optimistic local update.
    ///
    /// The habit leaves the delivered list immediately; if the write then
    /// fails, a fresh fetch reconciles the stream back to the stored state
    /// and the failure propagates to the caller.
    pub async fn archive(&self, user_id: &str, habit_id: &str) -> Result<habit::Model> {
        if let Some(sender) = self.channels.read().await.get(user_id) {
            sender.send_modify(|list| list.retain(|h| h.id != habit_id));
        }

        match habit_ops::archive_habit(&self.db, habit_id).await {
            Ok(archived) => {
                self.broadcast(user_id).await?;
                Ok(archived)
            }
            Err(e) => {
                warn!("archive of {habit_id} failed, re-fetching: {e}");
                self.broadcast(user_id).await?;
                Err(e)
            }
        }
    }

    /// Applies a progress change for a given reference date and refreshes the
    /// owner's stream. The underlying operation persists progress, streak,
    /// ledger, and points in one transaction.
    pub async fn update_progress_on(
        &self,
        habit: &habit::Model,
        new_progress: f64,
        today: NaiveDate,
    ) -> Result<habit::Model> {
        let updated = habit_ops::update_progress(&self.db, &habit.id, new_progress, today).await?;
        self.broadcast(&updated.user_id).await?;
        Ok(updated)
    }

    /// Applies a progress change dated today (local calendar).
    pub async fn update_progress(
        &self,
        habit: &habit::Model,
        new_progress: f64,
    ) -> Result<habit::Model> {
        self.update_progress_on(habit, new_progress, chrono::Local::now().date_naive())
            .await
    }
}

/// Handle to a user's live account/ledger stream.
pub struct UserSubscription {
    rx: watch::Receiver<user_account::Model>,
}

impl UserSubscription {
    /// Latest delivered account row.
    #[must_use]
    pub fn current(&self) -> user_account::Model {
        self.rx.borrow().clone()
    }

    /// Waits for the next delivery.
    pub async fn changed(&mut self) -> Result<()> {
        self.rx.changed().await.map_err(|_| Error::Storage {
            message: "user subscription terminated".to_string(),
        })
    }

    /// Explicitly ends delivery on this handle.
    pub fn cancel(self) {}
}

/// Live subscriptions over the account rows (the points ledger view).
///
/// The ledger itself is only written through the progress-update transaction;
/// this store re-broadcasts the stored row after such writes.
pub struct UserStore {
    db: DatabaseConnection,
    channels: RwLock<HashMap<String, watch::Sender<user_account::Model>>>,
}

impl UserStore {
    /// Creates a store over an established database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            channels: RwLock::new(HashMap::new()),
        }
    }

    async fn fetch(&self, user_id: &str) -> Result<user_account::Model> {
        crate::core::points::get_user(&self.db, user_id)
            .await?
            .ok_or_else(|| Error::UserNotFound {
                id: user_id.to_string(),
            })
    }

    /// Subscribes to a user's account row. Re-subscription shares the
    /// session's single stream without waking handles already on it.
    pub async fn subscribe(&self, user_id: &str) -> Result<UserSubscription> {
        let user = self.fetch(user_id).await?;

        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(user_id.to_string())
            .or_insert_with(|| watch::channel(user.clone()).0);
        if *sender.borrow() != user {
            sender.send_replace(user);
        }

        Ok(UserSubscription {
            rx: sender.subscribe(),
        })
    }

    /// Re-fetches the account row and pushes it to subscribers. Called after
    /// any operation that may have moved the ledger. Evicts the channel when
    /// its last receiver has dropped.
    pub async fn refresh(&self, user_id: &str) -> Result<()> {
        let user = self.fetch(user_id).await?;
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(user_id) {
            if sender.receiver_count() == 0 {
                channels.remove(user_id);
            } else {
                sender.send_replace(user);
            }
        }
        Ok(())
    }
}
