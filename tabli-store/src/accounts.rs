use std::collections::HashMap;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tabli_core::staff::StaffUser;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::StoreError;

#[derive(Debug, Clone)]
pub struct StaffAccount {
    pub user: StaffUser,
    pub restaurant_id: u32,
    password_hash: String,
}

impl StaffAccount {
    fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Staff logins keyed by lower-cased email.
#[derive(Default)]
pub struct StaffAccounts {
    accounts: RwLock<HashMap<String, StaffAccount>>,
}

impl StaffAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, user: StaffUser, password: &str, restaurant_id: u32) -> Result<StaffAccount, StoreError> {
        let key = user.email.trim().to_lowercase();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(StoreError::EmailTaken(user.email));
        }

        let account = StaffAccount {
            user,
            restaurant_id,
            password_hash: hash_password(password)?,
        };
        accounts.insert(key, account.clone());
        info!(restaurant_id, "Staff account registered");
        Ok(account)
    }

    /// Unknown email and wrong password fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<StaffAccount, StoreError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(&email.trim().to_lowercase())
            .ok_or(StoreError::InvalidCredentials)?;

        if account.verify_password(password)? {
            Ok(account.clone())
        } else {
            warn!(restaurant_id = account.restaurant_id, "Staff login rejected");
            Err(StoreError::InvalidCredentials)
        }
    }

    /// Replace the password after checking the current one.
    pub async fn change_password(&self, email: &str, current: &str, new: &str) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&email.trim().to_lowercase())
            .ok_or(StoreError::InvalidCredentials)?;

        if !account.verify_password(current)? {
            warn!(restaurant_id = account.restaurant_id, "Password change rejected");
            return Err(StoreError::InvalidCredentials);
        }
        account.password_hash = hash_password(new)?;
        info!(restaurant_id = account.restaurant_id, "Staff password changed");
        Ok(())
    }
}
