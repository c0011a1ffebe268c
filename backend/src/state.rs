use crate::settings::SettingsState;
use crate::storage::UploadStorage;
use crate::store::Store;

/// Everything a handler needs, shared across workers as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub uploads: UploadStorage,
    pub settings: SettingsState,
}

impl AppState {
    pub fn new(store: Store, uploads: UploadStorage) -> rusqlite::Result<Self> {
        let settings = SettingsState::load(&store)?;
        Ok(AppState {
            store,
            uploads,
            settings,
        })
    }
}
