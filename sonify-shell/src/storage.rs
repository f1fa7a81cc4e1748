use sonify_core::{PageError, PreferenceStore, Result};
use web_sys::Storage;

use crate::dom::describe;

fn local_storage() -> Result<Storage> {
    let window = web_sys::window().ok_or_else(|| PageError::Storage("no window".into()))?;
    window
        .local_storage()
        .map_err(|e| PageError::Storage(describe(&e)))?
        .ok_or_else(|| PageError::Storage("localStorage unavailable".into()))
}

/// `window.localStorage`, or nothing at all in private modes that refuse it.
pub(crate) struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub(crate) fn open() -> Self {
        let storage = local_storage()
            .map_err(|err| log::warn!("theme will not persist: {err}"))
            .ok();
        Self { storage }
    }
}

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match &self.storage {
            Some(storage) => storage
                .get_item(key)
                .map_err(|e| PageError::Storage(describe(&e))),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| PageError::Storage("localStorage unavailable".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| PageError::Storage(describe(&e)))
    }
}
