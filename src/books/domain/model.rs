use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::utils::date::serializer;

// BookEntity is the stored catalog record. `file` is the web path of the uploaded cover
// image or an empty string when the book has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookEntity {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub year: String,
    pub file: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    pub fn new(title: &str, author: &str, price: f64, year: &str, file: &str) -> Self {
        Self {
            book_id: next_book_id(),
            title: title.to_string(),
            author: author.to_string(),
            price,
            year: year.to_string(),
            file: file.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

// UUIDv7 ids sort lexically in creation order, which is what the newest-first listing relies on.
pub(crate) fn next_book_id() -> String {
    Uuid::now_v7().to_string()
}

// BookChanges is the payload of an edit. `file` is only written when a new image was uploaded,
// otherwise the stored reference is left alone.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BookChanges {
    pub title: String,
    pub author: String,
    pub price: f64,
    pub year: String,
    pub file: Option<String>,
}

impl BookChanges {
    pub fn apply(&self, entity: &mut BookEntity) {
        entity.title = self.title.to_string();
        entity.author = self.author.to_string();
        entity.price = self.price;
        entity.year = self.year.to_string();
        if let Some(file) = &self.file {
            entity.file = file.to_string();
        }
        entity.updated_at = Utc::now().naive_utc();
    }
}
