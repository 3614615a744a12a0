use std::sync::Arc;

use tabli_core::locale::Language;

use crate::kv::{load_json, save_json, KeyValueStore};
use crate::StoreError;

pub fn language_key(client_id: &str) -> String {
    format!("tabli-language:{}", client_id)
}

#[derive(Clone)]
pub struct PreferenceStore {
    kv: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Falls back to English when nothing usable is stored.
    pub async fn language(&self, client_id: &str) -> Result<Language, StoreError> {
        Ok(load_json(self.kv.as_ref(), &language_key(client_id)).await?.unwrap_or_default())
    }

    pub async fn set_language(&self, client_id: &str, language: Language) -> Result<(), StoreError> {
        save_json(self.kv.as_ref(), &language_key(client_id), &language, None).await
    }
}
