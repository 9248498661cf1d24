use crate::domain::{self, Book, BookId, Borrowing, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::consistency::{ensure_flag_matches_ledger, invariant_violation};
use super::errors::{LendingError, Result};
use super::lending_engine::ServiceDependencies;

/// 未返却の貸出と書籍の結合ビュー（表示用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenBorrowing {
    pub book: Book,
    pub borrowing: Borrowing,
}

impl OpenBorrowing {
    pub fn due_date(&self) -> DateTime<Utc> {
        self.borrowing.due_date
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        domain::borrowing::is_overdue(&self.borrowing, now)
    }
}

/// 参照系の窓口
///
/// 副作用なし。表示層はここから読み、書き込みは`LendingEngine`経由で行う。
/// カタログと台帳の食い違いを推測で埋めず、`InvariantViolation`として返す。
#[derive(Clone)]
pub struct QueryFacade {
    deps: ServiceDependencies,
    transaction_lock: Arc<RwLock<()>>,
}

impl QueryFacade {
    pub(super) fn new(deps: ServiceDependencies, transaction_lock: Arc<RwLock<()>>) -> Self {
        Self {
            deps,
            transaction_lock,
        }
    }

    /// すべての書籍を登録順に取得する
    pub async fn all_books(&self) -> Result<Vec<Book>> {
        let _guard = self.transaction_lock.read().await;
        self.list_books().await
    }

    /// 貸出可能な書籍を登録順に取得する
    pub async fn available_books(&self) -> Result<Vec<Book>> {
        let _guard = self.transaction_lock.read().await;
        let books = self.list_books().await?;
        Ok(books.into_iter().filter(|book| book.is_available).collect())
    }

    /// 貸出可能な書籍の一覧（表示層向け）
    pub async fn list_available(&self) -> Result<Vec<Book>> {
        self.available_books().await
    }

    /// IDで書籍を取得する
    pub async fn get_book(&self, book_id: BookId) -> Result<Book> {
        let _guard = self.transaction_lock.read().await;
        self.deps
            .catalog_store
            .get(book_id)
            .await
            .map_err(LendingError::CatalogStoreError)?
            .ok_or(LendingError::BookNotFound(book_id))
    }

    /// タイトル・著者・ISBNで書籍を検索する
    ///
    /// 大文字小文字を区別しない部分一致。空白のみのクエリは全件を返す。
    pub async fn search_books(&self, query: &str) -> Result<Vec<Book>> {
        let _guard = self.transaction_lock.read().await;
        let books = self.list_books().await?;

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(books);
        }

        Ok(books.into_iter().filter(|book| book.matches(&needle)).collect())
    }

    /// 利用者の未返却の貸出を書籍情報と結合して取得する
    pub async fn open_borrowings_for_user(&self, user_id: UserId) -> Result<Vec<OpenBorrowing>> {
        let _guard = self.transaction_lock.read().await;

        let borrowings = self
            .deps
            .ledger_store
            .find_open_by_user(user_id)
            .await
            .map_err(LendingError::LedgerStoreError)?;

        let mut open_borrowings = Vec::with_capacity(borrowings.len());
        for borrowing in borrowings {
            open_borrowings.push(self.join_book(borrowing).await?);
        }
        Ok(open_borrowings)
    }

    /// 利用者の借りている書籍と返却期限の一覧
    pub async fn list_open_for_user(&self, user_id: UserId) -> Result<Vec<(Book, DateTime<Utc>)>> {
        let open_borrowings = self.open_borrowings_for_user(user_id).await?;
        Ok(open_borrowings
            .into_iter()
            .map(|open| {
                let due_date = open.due_date();
                (open.book, due_date)
            })
            .collect())
    }

    /// 利用者がこの書籍を借りているか（書籍詳細画面用）
    pub async fn open_borrowing_for_book(
        &self,
        book_id: BookId,
        user_id: UserId,
    ) -> Result<Option<OpenBorrowing>> {
        let _guard = self.transaction_lock.read().await;

        let borrowing = self
            .deps
            .ledger_store
            .find_open(book_id)
            .await
            .map_err(LendingError::LedgerStoreError)?;

        match borrowing {
            Some(borrowing) if borrowing.user_id == user_id => {
                Ok(Some(self.join_book(borrowing).await?))
            }
            _ => Ok(None),
        }
    }

    /// 利用者の貸出履歴（返却済みを含む）を追記順に取得する
    pub async fn borrowing_history_for_user(&self, user_id: UserId) -> Result<Vec<Borrowing>> {
        let _guard = self.transaction_lock.read().await;
        self.deps
            .ledger_store
            .find_by_user(user_id)
            .await
            .map_err(LendingError::LedgerStoreError)
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        self.deps
            .catalog_store
            .list()
            .await
            .map_err(LendingError::CatalogStoreError)
    }

    async fn join_book(&self, borrowing: Borrowing) -> Result<OpenBorrowing> {
        let book = self
            .deps
            .catalog_store
            .get(borrowing.book_id)
            .await
            .map_err(LendingError::CatalogStoreError)?
            .ok_or_else(|| {
                invariant_violation(format!(
                    "open borrowing {} references unknown book {}",
                    borrowing.borrowing_id, borrowing.book_id
                ))
            })?;

        ensure_flag_matches_ledger(&book, Some(&borrowing))?;

        Ok(OpenBorrowing { book, borrowing })
    }
}
