use std::sync::Arc;
use axum::http::StatusCode;
use crate::catalog::domain::CatalogService;
use crate::core::auth::Authenticator;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;
use crate::uploads::UploadHandler;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Configuration,
    pub(crate) catalog: Arc<dyn CatalogService>,
    pub(crate) uploads: Arc<dyn UploadHandler>,
    pub(crate) auth: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(config: Configuration,
               catalog: Arc<dyn CatalogService>,
               uploads: Arc<dyn UploadHandler>,
               auth: Arc<dyn Authenticator>) -> AppState {
        AppState {
            config,
            catalog,
            uploads,
            auth,
        }
    }
}

pub(crate) type ServerError = (StatusCode, String);

// the message is for logs, pages only ever show the status
impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::Access { .. } |
            CommandError::Serialization { .. } |
            CommandError::Validation { .. } => StatusCode::BAD_REQUEST,
            CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommandError::Database { .. } |
            CommandError::Runtime { .. } |
            CommandError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, format!("{:?}", err))
    }
}
