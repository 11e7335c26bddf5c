use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookForm;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::uploads::{UploadedFile, UploadHandler};

pub(crate) struct UpdateBookCommand {
    catalog_service: Arc<dyn CatalogService>,
    upload_handler: Arc<dyn UploadHandler>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>, upload_handler: Arc<dyn UploadHandler>) -> Self {
        Self {
            catalog_service,
            upload_handler,
        }
    }
}

#[derive(Debug)]
pub(crate) struct UpdateBookCommandRequest {
    pub book_id: String,
    pub form: BookForm,
    pub upload: Option<UploadedFile>,
}

impl UpdateBookCommandRequest {
    pub fn new(book_id: &str, form: BookForm, upload: Option<UploadedFile>) -> Self {
        Self {
            book_id: book_id.to_string(),
            form,
            upload,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    pub book_id: String,
}

impl UpdateBookCommandResponse {
    pub fn new(book_id: &str) -> Self {
        Self {
            book_id: book_id.to_string(),
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        let mut changes = req.form.to_changes(None)?;
        // file stays out of the update unless a new image came with the form
        if let Some(upload) = &req.upload {
            changes.file = Some(self.upload_handler.store(upload).await?);
        }
        self.catalog_service.update_book(req.book_id.as_str(), &changes).await
            .map_err(CommandError::from).map(|_| UpdateBookCommandResponse::new(req.book_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::dto::BookForm;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::command::Command;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::uploads::{DiskUploadHandler, UploadedFile, UploadHandler};

    #[tokio::test]
    async fn test_should_run_update_book() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let svc: Arc<dyn CatalogService> = Arc::from(
            factory::create_catalog_service(&Configuration::new(RepositoryStore::Memory)).await);
        let uploads: Arc<dyn UploadHandler> = Arc::new(DiskUploadHandler::new(dir.path(), "/images/uploads"));
        let add_cmd = AddBookCommand::new(svc.clone(), uploads.clone());
        let update_cmd = UpdateBookCommand::new(svc.clone(), uploads);

        let upload = UploadedFile::new("cover.gif", None, b"gif".to_vec());
        let added = add_cmd.execute(AddBookCommandRequest::new(
            BookForm::new("Ulysses", "James Joyce", "20", "1922"), Some(upload))).await.expect("should add book");
        let original_file = added.book.file.to_string();

        // no new upload keeps the stored file
        let req = UpdateBookCommandRequest::new(added.book.book_id.as_str(),
                                                BookForm::new("Dubliners", "James Joyce", "9", "1914"), None);
        let _ = update_cmd.execute(req).await.expect("should update book");
        let loaded = svc.find_book_by_id(added.book.book_id.as_str()).await.expect("should return book").expect("should exist");
        assert_eq!("Dubliners", loaded.title.as_str());
        assert_eq!(9.0, loaded.price);
        assert_eq!(original_file, loaded.file);

        // a new upload replaces it
        let upload = UploadedFile::new("new.png", None, b"png".to_vec());
        let req = UpdateBookCommandRequest::new(added.book.book_id.as_str(),
                                                BookForm::new("Dubliners", "James Joyce", "9", "1914"), Some(upload));
        let _ = update_cmd.execute(req).await.expect("should update book");
        let loaded = svc.find_book_by_id(added.book.book_id.as_str()).await.expect("should return book").expect("should exist");
        assert_ne!(original_file, loaded.file);
        assert!(loaded.file.ends_with(".png"));
    }
}
