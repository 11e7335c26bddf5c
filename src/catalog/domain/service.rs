use async_trait::async_trait;
use tracing::info;
use crate::books::domain::model::{BookChanges, BookEntity};
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;

pub(crate) struct CatalogServiceImpl {
    page_size: usize,
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            page_size: config.page_size,
            book_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn list_books(&self) -> LibraryResult<Vec<BookDto>> {
        let books = self.book_repository.find_all(self.page_size).await?;
        Ok(books.iter().map(BookDto::from).collect())
    }

    async fn add_book(&self, changes: &BookChanges) -> LibraryResult<BookDto> {
        let file = changes.file.clone().unwrap_or_default();
        let book = BookEntity::new(changes.title.as_str(), changes.author.as_str(),
                                   changes.price, changes.year.as_str(), file.as_str());
        let _ = self.book_repository.create(&book).await?;
        info!("added book {}", book.book_id);
        Ok(BookDto::from(&book))
    }

    async fn remove_book(&self, id: &str) -> LibraryResult<()> {
        let removed = self.book_repository.delete(id).await?;
        info!("removed book {} ({})", id, removed);
        Ok(())
    }

    async fn update_book(&self, id: &str, changes: &BookChanges) -> LibraryResult<()> {
        let updated = self.book_repository.update(id, changes).await?;
        info!("updated book {} ({})", id, updated);
        Ok(())
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<Option<BookDto>> {
        self.book_repository.get(id).await.map(|b| b.as_ref().map(BookDto::from))
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            book_id: other.book_id.to_string(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            price: other.price,
            year: other.year.to_string(),
            file: other.file.to_string(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
