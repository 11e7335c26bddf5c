use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookChanges;
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::date::serializer;

// BookDto is a data transfer object for Catalog service and the views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDto {
    #[serde(rename = "_id")]
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

// BookForm carries the text fields of the add and edit forms as submitted
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct BookForm {
    pub title: String,
    pub author: String,
    pub price: String,
    pub year: String,
}

impl BookForm {
    pub fn new(title: &str, author: &str, price: &str, year: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            price: price.to_string(),
            year: year.to_string(),
        }
    }

    // sets a form field by its input name, unknown names are ignored
    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = value,
            "author" => self.author = value,
            "price" => self.price = value,
            "year" => self.year = value,
            _ => {}
        }
    }

    // checks required fields and casts the price, text is stored as submitted and `file` is
    // passed through untouched
    pub fn to_changes(&self, file: Option<String>) -> LibraryResult<BookChanges> {
        let title = required("title", &self.title)?;
        let author = required("author", &self.author)?;
        let year = required("year", &self.year)?;
        let price = required("price", &self.price)?.trim().parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| LibraryError::validation(
                format!("price is not a number {:?}", self.price).as_str(), Some("price".to_string())))?;
        Ok(BookChanges {
            title,
            author,
            price,
            year,
            file,
        })
    }
}

// blank counts as missing, the value itself is kept as is
fn required(name: &str, value: &str) -> LibraryResult<String> {
    if value.trim().is_empty() {
        return Err(LibraryError::validation(
            format!("{} is required", name).as_str(), Some(name.to_string())));
    }
    Ok(value.to_string())
}
