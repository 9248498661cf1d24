use crate::domain::{Book, BookId, NewBook};
use crate::ports::catalog_store::{CatalogStore as CatalogStoreTrait, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct Catalog {
    books: Vec<Book>,
    index: HashMap<BookId, usize>,
}

/// In-memory implementation of CatalogStore
///
/// Keeps books in insertion order with a positional index by id.
/// Books are never removed, so positions stay valid.
pub struct CatalogStore {
    catalog: RwLock<Catalog>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(Catalog::default()),
        }
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStoreTrait for CatalogStore {
    async fn insert(&self, new_book: NewBook) -> Result<Book> {
        let mut catalog = self.catalog.write();
        let book = new_book.into_book(BookId::new());
        let position = catalog.books.len();
        catalog.index.insert(book.book_id, position);
        catalog.books.push(book.clone());
        Ok(book)
    }

    async fn get(&self, book_id: BookId) -> Result<Option<Book>> {
        let catalog = self.catalog.read();
        Ok(catalog
            .index
            .get(&book_id)
            .map(|&position| catalog.books[position].clone()))
    }

    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.catalog.read().books.clone())
    }

    async fn set_availability(&self, book_id: BookId, is_available: bool) -> Result<Option<Book>> {
        let mut catalog = self.catalog.write();
        let Some(position) = catalog.index.get(&book_id).copied() else {
            return Ok(None);
        };

        let book = &mut catalog.books[position];
        book.is_available = is_available;
        Ok(Some(book.clone()))
    }
}
