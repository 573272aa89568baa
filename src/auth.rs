//! Identity provider abstraction.
//!
//! The hosted identity service is an external collaborator with a narrow
//! contract; components receive an implementation by injection instead of
//! reaching for a process-wide client. Email/password and federated sign-in
//! are alternate entry paths into the same surface - the core only cares
//! that a user id comes back.

use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use ulid::Ulid;

/// Narrow contract the core depends on for authentication.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Whether a user is currently signed in.
    fn is_signed_in(&self) -> bool;

    /// Opaque id of the signed-in user, if any.
    fn current_user_id(&self) -> Option<String>;

    /// Ends the current session. A no-op when nobody is signed in.
    fn sign_out(&self);

    /// Registers a new identity and signs it in, returning its user id.
    async fn sign_up(&self, email: &str, password: &str) -> Result<String>;

    /// Authenticates an existing identity, returning its user id.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String>;

    /// Permanently deletes the signed-in identity. Called last in the
    /// account-deletion cascade, after the user's data is already gone.
    async fn delete_identity(&self) -> Result<()>;
}

#[derive(Default)]
struct IdentityState {
    /// email -> (user id, password)
    users: HashMap<String, (String, String)>,
    signed_in: Option<String>,
}

/// In-process identity provider backing tests and local runs.
#[derive(Default)]
pub struct LocalIdentity {
    state: Mutex<IdentityState>,
}

impl LocalIdentity {
    /// Creates an empty provider with nobody registered or signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IdentityState> {
        // Lock poisoning only happens after a panic mid-update; propagating
        // the inner state is still sound for this in-memory map.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl IdentityProvider for LocalIdentity {
    fn is_signed_in(&self) -> bool {
        self.lock().signed_in.is_some()
    }

    fn current_user_id(&self) -> Option<String> {
        self.lock().signed_in.clone()
    }

    fn sign_out(&self) {
        self.lock().signed_in = None;
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<String> {
        let mut state = self.lock();
        if state.users.contains_key(email) {
            return Err(Error::Auth {
                message: format!("an account already exists for {email}"),
            });
        }
        let user_id = Ulid::new().to_string();
        state
            .users
            .insert(email.to_string(), (user_id.clone(), password.to_string()));
        state.signed_in = Some(user_id.clone());
        Ok(user_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        let mut state = self.lock();
        match state.users.get(email) {
            Some((user_id, stored)) if stored == password => {
                let user_id = user_id.clone();
                state.signed_in = Some(user_id.clone());
                Ok(user_id)
            }
            _ => Err(Error::Auth {
                message: "invalid email or password".to_string(),
            }),
        }
    }

    async fn delete_identity(&self) -> Result<()> {
        let mut state = self.lock();
        let Some(user_id) = state.signed_in.take() else {
            return Err(Error::NotSignedIn);
        };
        state.users.retain(|_, (id, _)| *id != user_id);
        Ok(())
    }
}
