//! Upload form: validates locally, posts the file, then refreshes the list.

use crate::config::UploadSettings;
use crate::error::ClientError;
use crate::models::{CreatedDocument, UploadFile};
use crate::services::ApiClient;
use crate::sync::RefreshHandle;
use parking_lot::Mutex;

#[derive(Default)]
struct UploadState {
    selected: Option<UploadFile>,
    uploading: bool,
    error: Option<String>,
}

pub struct UploadForm {
    api: ApiClient,
    limits: UploadSettings,
    list: RefreshHandle,
    state: Mutex<UploadState>,
}

impl UploadForm {
    pub fn new(api: ApiClient, limits: UploadSettings, list: RefreshHandle) -> Self {
        Self {
            api,
            limits,
            list,
            state: Mutex::new(UploadState::default()),
        }
    }

    /// Pick a file. An invalid file is rejected and clears the selection.
    pub fn select_file(&self, file: UploadFile) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        match file.validate(&self.limits) {
            Ok(()) => {
                state.selected = Some(file);
                state.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(filename = %file.filename, error = %e, "Upload rejected before sending");
                state.selected = None;
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn selected(&self) -> Option<String> {
        self.state.lock().selected.as_ref().map(|f| f.filename.clone())
    }

    pub fn is_uploading(&self) -> bool {
        self.state.lock().uploading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Upload the selected file. `Ok(None)` when nothing is selected.
    pub async fn submit(&self) -> Result<Option<CreatedDocument>, ClientError> {
        let file = {
            let mut state = self.state.lock();
            if state.uploading {
                return Ok(None);
            }
            let Some(file) = state.selected.clone() else {
                return Ok(None);
            };
            state.uploading = true;
            state.error = None;
            file
        };

        let result = match file.validate(&self.limits) {
            Ok(()) => self.api.create_document(&file).await,
            Err(e) => Err(e),
        };

        {
            let mut state = self.state.lock();
            state.uploading = false;
            match &result {
                Ok(_) => state.selected = None,
                Err(e) => state.error = Some(e.user_message()),
            }
        }

        let created = result?;
        self.list.refresh().await;
        Ok(Some(created))
    }

    /// Select and submit in one step.
    pub async fn upload(&self, file: UploadFile) -> Result<Option<CreatedDocument>, ClientError> {
        self.select_file(file)?;
        self.submit().await
    }
}
