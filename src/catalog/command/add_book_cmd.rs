use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::{BookDto, BookForm};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::uploads::{UploadedFile, UploadHandler};

pub(crate) struct AddBookCommand {
    catalog_service: Arc<dyn CatalogService>,
    upload_handler: Arc<dyn UploadHandler>,
}

impl AddBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>, upload_handler: Arc<dyn UploadHandler>) -> Self {
        Self {
            catalog_service,
            upload_handler,
        }
    }
}

#[derive(Debug)]
pub(crate) struct AddBookCommandRequest {
    pub(crate) form: BookForm,
    pub(crate) upload: Option<UploadedFile>,
}

impl AddBookCommandRequest {
    pub fn new(form: BookForm, upload: Option<UploadedFile>) -> Self {
        Self {
            form,
            upload,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddBookCommandResponse {
    pub book: BookDto,
}

impl AddBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        let mut changes = req.form.to_changes(None)?;
        // a book without an image is stored with an empty file
        changes.file = Some(match &req.upload {
            Some(upload) => self.upload_handler.store(upload).await?,
            None => String::new(),
        });
        self.catalog_service.add_book(&changes).await.map_err(CommandError::from).map(AddBookCommandResponse::new)
    }
}
