use crate::domain::{BookId, Borrowing, BorrowingId, NewBorrowing, UserId};
use crate::ports::ledger_store::{LedgerStore as LedgerStoreTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::MemoryStoreError;

struct Ledger {
    records: Vec<Borrowing>,
    next_id: BorrowingId,
}

/// In-memory implementation of LedgerStore
///
/// Append-only vector of borrowings. Lookups are linear scans, which is
/// fine for the record counts of a single library.
pub struct LedgerStore {
    ledger: RwLock<Ledger>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            ledger: RwLock::new(Ledger {
                records: Vec::new(),
                next_id: BorrowingId::from_u64(1),
            }),
        }
    }

    fn filter_records(&self, predicate: impl Fn(&Borrowing) -> bool) -> Vec<Borrowing> {
        self.ledger
            .read()
            .records
            .iter()
            .filter(|borrowing| predicate(borrowing))
            .cloned()
            .collect()
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStoreTrait for LedgerStore {
    async fn append(&self, new_borrowing: NewBorrowing) -> Result<Borrowing> {
        let mut ledger = self.ledger.write();
        let borrowing = new_borrowing.into_borrowing(ledger.next_id);
        ledger.next_id = ledger.next_id.next();
        ledger.records.push(borrowing.clone());
        Ok(borrowing)
    }

    async fn find_open(&self, book_id: BookId) -> Result<Option<Borrowing>> {
        Ok(self
            .ledger
            .read()
            .records
            .iter()
            .find(|borrowing| borrowing.book_id == book_id && borrowing.is_open())
            .cloned())
    }

    async fn find_open_by_user(&self, user_id: UserId) -> Result<Vec<Borrowing>> {
        Ok(self.filter_records(|borrowing| borrowing.user_id == user_id && borrowing.is_open()))
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Borrowing>> {
        Ok(self.filter_records(|borrowing| borrowing.user_id == user_id))
    }

    async fn list_open(&self) -> Result<Vec<Borrowing>> {
        Ok(self.filter_records(Borrowing::is_open))
    }

    async fn find_by_book(&self, book_id: BookId) -> Result<Vec<Borrowing>> {
        Ok(self.filter_records(|borrowing| borrowing.book_id == book_id))
    }

    async fn mark_returned(
        &self,
        borrowing_id: BorrowingId,
        returned_at: DateTime<Utc>,
    ) -> Result<Option<Borrowing>> {
        let mut ledger = self.ledger.write();
        let Some(borrowing) = ledger
            .records
            .iter_mut()
            .find(|borrowing| borrowing.borrowing_id == borrowing_id)
        else {
            return Ok(None);
        };

        if !borrowing.is_open() {
            return Err(Box::new(MemoryStoreError::AlreadyReturned(borrowing_id)));
        }

        borrowing.returned_at = Some(returned_at);
        Ok(Some(borrowing.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::borrowing::due_date_for;

    fn new_borrowing(book_id: BookId, user_id: UserId) -> NewBorrowing {
        let borrowed_at = Utc::now();
        NewBorrowing {
            book_id,
            user_id,
            borrowed_at,
            due_date: due_date_for(borrowed_at).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_append_assigns_monotonic_ids() {
        let store = LedgerStore::new();
        let book_id = BookId::new();
        let user_id = UserId::new();

        let first = store.append(new_borrowing(book_id, user_id)).await.unwrap();
        let second = store.append(new_borrowing(BookId::new(), user_id)).await.unwrap();

        assert_eq!(first.borrowing_id.value(), 1);
        assert_eq!(second.borrowing_id.value(), 2);
        assert!(first.is_open());
    }

    #[tokio::test]
    async fn test_find_open_ignores_returned_records() {
        let store = LedgerStore::new();
        let book_id = BookId::new();
        let user_id = UserId::new();

        let borrowing = store.append(new_borrowing(book_id, user_id)).await.unwrap();
        assert_eq!(
            store.find_open(book_id).await.unwrap().map(|b| b.borrowing_id),
            Some(borrowing.borrowing_id)
        );

        store
            .mark_returned(borrowing.borrowing_id, Utc::now())
            .await
            .unwrap();

        assert_eq!(store.find_open(book_id).await.unwrap(), None);
        assert_eq!(store.find_by_book(book_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_user_includes_returned_records() {
        let store = LedgerStore::new();
        let user_id = UserId::new();

        let first = store.append(new_borrowing(BookId::new(), user_id)).await.unwrap();
        store.append(new_borrowing(BookId::new(), user_id)).await.unwrap();
        store.append(new_borrowing(BookId::new(), UserId::new())).await.unwrap();
        store.mark_returned(first.borrowing_id, Utc::now()).await.unwrap();

        assert_eq!(store.find_by_user(user_id).await.unwrap().len(), 2);
        assert_eq!(store.find_open_by_user(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_open_spans_books_and_users() {
        let store = LedgerStore::new();
        let first = store
            .append(new_borrowing(BookId::new(), UserId::new()))
            .await
            .unwrap();
        let second = store
            .append(new_borrowing(BookId::new(), UserId::new()))
            .await
            .unwrap();
        let third = store
            .append(new_borrowing(BookId::new(), UserId::new()))
            .await
            .unwrap();
        store.mark_returned(second.borrowing_id, Utc::now()).await.unwrap();

        let open: Vec<BorrowingId> = store
            .list_open()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.borrowing_id)
            .collect();

        assert_eq!(open, vec![first.borrowing_id, third.borrowing_id]);
    }

    #[tokio::test]
    async fn test_mark_returned_unknown_id_returns_none() {
        let store = LedgerStore::new();
        let result = store
            .mark_returned(BorrowingId::from_u64(42), Utc::now())
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_mark_returned_twice_fails() {
        let store = LedgerStore::new();
        let borrowing = store
            .append(new_borrowing(BookId::new(), UserId::new()))
            .await
            .unwrap();
        let returned_at = Utc::now();

        store.mark_returned(borrowing.borrowing_id, returned_at).await.unwrap();
        let result = store.mark_returned(borrowing.borrowing_id, Utc::now()).await;

        assert!(result.is_err());
        let records = store.find_by_book(borrowing.book_id).await.unwrap();
        assert_eq!(records[0].returned_at, Some(returned_at));
    }
}
