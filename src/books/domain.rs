pub mod model;

use crate::books::domain::model::BookEntity;
use crate::core::domain::Identifiable;

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.book_id.to_string()
    }
}
