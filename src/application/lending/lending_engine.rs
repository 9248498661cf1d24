use crate::domain::{
    self, Book, BookId, BorrowBookError, Borrowing, NewBook, ReturnBookError, UserId,
    commands::*,
};
use crate::ports::*;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::consistency::{ensure_flag_matches_ledger, invariant_violation};
use super::errors::{LendingError, Result};
use super::query::QueryFacade;

/// サービスの依存関係
///
/// 各ストアの実装を差し替え可能にするためのデータ構造。
/// 振る舞いは持たず、`LendingEngine`に渡されて所有される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub catalog_store: Arc<dyn CatalogStore>,
    pub ledger_store: Arc<dyn LedgerStore>,
    pub identity_provider: Arc<dyn IdentityProvider>,
}

/// 貸出エンジン
///
/// カタログと台帳にまたがる書き込みの唯一の窓口。
///
/// # 一貫性保証
///
/// 貸出・返却・登録はすべて共有ロックの書き込み側で直列化される。
/// 参照系（[`QueryFacade`]）は読み取り側を取るため、取引の途中状態は見えない。
///
/// 2つ目のストア書き込みに失敗した場合は、1つ目の書き込み（貸出可否フラグ）を
/// 元に戻してからエラーを返す。戻せなかった場合は`InvariantViolation`とする。
pub struct LendingEngine {
    deps: ServiceDependencies,
    transaction_lock: Arc<RwLock<()>>,
}

impl LendingEngine {
    pub fn new(deps: ServiceDependencies) -> Self {
        Self {
            deps,
            transaction_lock: Arc::new(RwLock::new(())),
        }
    }

    /// 参照系の窓口を取得する
    ///
    /// 同じロックを共有するため、取引の途中状態を読むことはない。
    pub fn queries(&self) -> QueryFacade {
        QueryFacade::new(self.deps.clone(), Arc::clone(&self.transaction_lock))
    }

    /// 書籍をカタログに登録する
    #[tracing::instrument(skip(self, new_book), fields(title = %new_book.title))]
    pub async fn add_book(&self, new_book: NewBook) -> Result<Book> {
        let _guard = self.transaction_lock.write().await;

        let book = self
            .deps
            .catalog_store
            .insert(new_book)
            .await
            .map_err(LendingError::CatalogStoreError)?;

        tracing::info!(book_id = %book.book_id, "Book added to catalog");
        Ok(book)
    }

    /// 現在時刻で書籍を借りる
    pub async fn borrow(&self, book_id: BookId, user_id: UserId) -> Result<Borrowing> {
        self.execute_borrow(BorrowBook {
            book_id,
            user_id,
            borrowed_at: Utc::now(),
        })
        .await
    }

    /// 現在時刻で書籍を返却する
    pub async fn return_book(&self, book_id: BookId, user_id: UserId) -> Result<Borrowing> {
        self.execute_return(ReturnBook {
            book_id,
            user_id,
            returned_at: Utc::now(),
        })
        .await
    }

    /// 書籍を借りる
    ///
    /// ビジネスルール：
    /// - 書籍が存在すること
    /// - 利用者が存在すること
    /// - 書籍が貸出可能であること（台帳に未返却の貸出がないこと）
    /// - 返却期限は貸出日時の14日後（計算できない日時は`InvalidBorrowDate`）
    ///
    /// # 戻り値
    /// 台帳に追記された未返却の貸出
    #[tracing::instrument(skip(self, cmd), fields(book_id = %cmd.book_id, user_id = %cmd.user_id))]
    pub async fn execute_borrow(&self, cmd: BorrowBook) -> Result<Borrowing> {
        let _guard = self.transaction_lock.write().await;

        // 1. 書籍の存在確認
        let book = self.load_book(cmd.book_id).await?;

        // 2. 利用者の存在確認
        let user_exists = self
            .deps
            .identity_provider
            .exists(cmd.user_id)
            .await
            .map_err(LendingError::IdentityProviderError)?;

        if !user_exists {
            tracing::debug!("Borrow rejected: unknown user");
            return Err(LendingError::UserNotFound(cmd.user_id));
        }

        // 3. フラグと台帳の突き合わせ
        let open = self.find_open(cmd.book_id).await?;
        ensure_flag_matches_ledger(&book, open.as_ref())?;

        // 4. ドメイン層の純粋関数を呼び出し
        let new_borrowing = domain::borrowing::borrow_book(&book, cmd.user_id, cmd.borrowed_at)
            .map_err(|e| match e {
                BorrowBookError::Unavailable => {
                    tracing::debug!("Borrow rejected: book is already borrowed");
                    LendingError::Unavailable(cmd.book_id)
                }
                BorrowBookError::DueDateOutOfRange => {
                    tracing::debug!(borrowed_at = %cmd.borrowed_at, "Borrow rejected: due date out of range");
                    LendingError::InvalidBorrowDate(cmd.borrowed_at)
                }
            })?;

        // 5. 貸出可否フラグを下ろす
        self.deps
            .catalog_store
            .set_availability(cmd.book_id, false)
            .await
            .map_err(LendingError::CatalogStoreError)?
            .ok_or_else(|| {
                invariant_violation(format!("book {} vanished from the catalog", cmd.book_id))
            })?;

        // 6. 台帳に追記（失敗したらフラグを戻す）
        let borrowing = match self.deps.ledger_store.append(new_borrowing).await {
            Ok(borrowing) => borrowing,
            Err(e) => {
                self.restore_availability(cmd.book_id, true).await?;
                return Err(LendingError::LedgerStoreError(e));
            }
        };

        tracing::info!(
            borrowing_id = %borrowing.borrowing_id,
            due_date = %borrowing.due_date,
            "Book borrowed"
        );
        Ok(borrowing)
    }

    /// 書籍を返却する
    ///
    /// ビジネスルール：
    /// - (書籍, 利用者) に一致する未返却の貸出があること
    /// - 他の利用者の貸出は返却できない（NotFoundとして扱う）
    ///
    /// # 戻り値
    /// 返却日時が設定された貸出
    #[tracing::instrument(skip(self, cmd), fields(book_id = %cmd.book_id, user_id = %cmd.user_id))]
    pub async fn execute_return(&self, cmd: ReturnBook) -> Result<Borrowing> {
        let _guard = self.transaction_lock.write().await;

        // 1. 未返却の貸出と書籍を取得して突き合わせ
        let open = self.find_open(cmd.book_id).await?;
        let book = self
            .deps
            .catalog_store
            .get(cmd.book_id)
            .await
            .map_err(LendingError::CatalogStoreError)?;

        match (&book, &open) {
            (None, None) => {
                tracing::debug!("Return rejected: unknown book");
                return Err(LendingError::BookNotFound(cmd.book_id));
            }
            (None, Some(borrowing)) => {
                return Err(invariant_violation(format!(
                    "open borrowing {} references unknown book {}",
                    borrowing.borrowing_id, cmd.book_id
                )));
            }
            (Some(book), open) => ensure_flag_matches_ledger(book, open.as_ref())?,
        }

        let not_found = || LendingError::BorrowingNotFound {
            book_id: cmd.book_id,
            user_id: cmd.user_id,
        };

        let Some(open) = open else {
            tracing::debug!("Return rejected: book is not borrowed");
            return Err(not_found());
        };

        // 2. ドメイン層の純粋関数で検証
        domain::borrowing::return_borrowing(&open, cmd.user_id, cmd.returned_at).map_err(
            |e| match e {
                ReturnBookError::NotBorrower => {
                    tracing::debug!("Return rejected: borrowed by another user");
                    not_found()
                }
                ReturnBookError::AlreadyReturned => invariant_violation(format!(
                    "ledger reported returned borrowing {} as open",
                    open.borrowing_id
                )),
            },
        )?;

        // 3. 貸出可否フラグを上げる
        self.deps
            .catalog_store
            .set_availability(cmd.book_id, true)
            .await
            .map_err(LendingError::CatalogStoreError)?
            .ok_or_else(|| {
                invariant_violation(format!("book {} vanished from the catalog", cmd.book_id))
            })?;

        // 4. 台帳を返却済みにする（失敗したらフラグを戻す）
        let returned = match self
            .deps
            .ledger_store
            .mark_returned(open.borrowing_id, cmd.returned_at)
            .await
        {
            Ok(Some(returned)) => returned,
            Ok(None) => {
                self.restore_availability(cmd.book_id, false).await?;
                return Err(invariant_violation(format!(
                    "borrowing {} vanished from the ledger",
                    open.borrowing_id
                )));
            }
            Err(e) => {
                self.restore_availability(cmd.book_id, false).await?;
                return Err(LendingError::LedgerStoreError(e));
            }
        };

        tracing::info!(borrowing_id = %returned.borrowing_id, "Book returned");
        Ok(returned)
    }

    /// カタログ全体でフラグと台帳の整合性を検証する
    ///
    /// - 書籍ごとに未返却の貸出は高々1件
    /// - `is_available == true` ⇔ 未返却の貸出がない
    /// - 未返却の貸出はすべてカタログに存在する書籍を参照する
    pub async fn check_consistency(&self) -> Result<()> {
        let _guard = self.transaction_lock.read().await;

        let books = self
            .deps
            .catalog_store
            .list()
            .await
            .map_err(LendingError::CatalogStoreError)?;

        for book in &books {
            let records = self
                .deps
                .ledger_store
                .find_by_book(book.book_id)
                .await
                .map_err(LendingError::LedgerStoreError)?;

            let open: Vec<&Borrowing> = records.iter().filter(|b| b.is_open()).collect();
            if open.len() > 1 {
                return Err(invariant_violation(format!(
                    "book {} has {} open borrowings",
                    book.book_id,
                    open.len()
                )));
            }

            ensure_flag_matches_ledger(book, open.first().copied())?;
        }

        let open = self
            .deps
            .ledger_store
            .list_open()
            .await
            .map_err(LendingError::LedgerStoreError)?;

        let catalog: HashSet<BookId> = books.iter().map(|book| book.book_id).collect();
        if let Some(orphan) = open.iter().find(|b| !catalog.contains(&b.book_id)) {
            return Err(invariant_violation(format!(
                "open borrowing {} references unknown book {}",
                orphan.borrowing_id, orphan.book_id
            )));
        }

        Ok(())
    }

    async fn load_book(&self, book_id: BookId) -> Result<Book> {
        self.deps
            .catalog_store
            .get(book_id)
            .await
            .map_err(LendingError::CatalogStoreError)?
            .ok_or_else(|| {
                tracing::debug!("Rejected: unknown book");
                LendingError::BookNotFound(book_id)
            })
    }

    async fn find_open(&self, book_id: BookId) -> Result<Option<Borrowing>> {
        self.deps
            .ledger_store
            .find_open(book_id)
            .await
            .map_err(LendingError::LedgerStoreError)
    }

    /// 取引途中で失敗したときにフラグを元に戻す
    async fn restore_availability(&self, book_id: BookId, is_available: bool) -> Result<()> {
        match self
            .deps
            .catalog_store
            .set_availability(book_id, is_available)
            .await
        {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(invariant_violation(format!(
                "cannot restore availability of book {book_id}: not in catalog"
            ))),
            Err(e) => Err(invariant_violation(format!(
                "cannot restore availability of book {book_id}: {e}"
            ))),
        }
    }
}
