use futures::future::join_all;
use lending_ledger::LendingError;
use lending_ledger::ports::LedgerStore as _;
use std::sync::Arc;

mod common;

use common::{add_sample_books, setup_library};

const CONTENDERS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_borrows_of_same_book_admit_one() {
    let library = setup_library();
    let books = add_sample_books(&library.engine).await;
    let book_id = books[0].book_id;
    let users: Vec<_> = (0..CONTENDERS)
        .map(|_| library.identity_provider.register())
        .collect();
    let engine = Arc::new(library.engine);

    let handles = users.into_iter().map(|user_id| {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.borrow(book_id, user_id).await })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let unavailable = results
        .iter()
        .filter(|r| matches!(r, Err(LendingError::Unavailable(_))))
        .count();
    assert_eq!(succeeded, 1);
    assert_eq!(unavailable, CONTENDERS - 1);

    let records = library.ledger_store.find_by_book(book_id).await.unwrap();
    assert_eq!(records.len(), 1);
    engine.check_consistency().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cycles_and_reads_stay_consistent() {
    let library = setup_library();
    let books = add_sample_books(&library.engine).await;
    let users: Vec<_> = (0..books.len())
        .map(|_| library.identity_provider.register())
        .collect();
    let engine = Arc::new(library.engine);

    // 書き込み：利用者ごとに別の書籍を繰り返し貸出・返却
    let writers = books.iter().zip(users.iter()).map(|(book, &user_id)| {
        let engine = Arc::clone(&engine);
        let book_id = book.book_id;
        tokio::spawn(async move {
            for _ in 0..10 {
                engine.borrow(book_id, user_id).await.unwrap();
                engine.return_book(book_id, user_id).await.unwrap();
            }
        })
    });

    // 読み取り：途中状態を観測しないこと
    let readers = users.iter().map(|&user_id| {
        let queries = engine.queries();
        tokio::spawn(async move {
            for _ in 0..20 {
                queries.open_borrowings_for_user(user_id).await.unwrap();
                queries.available_books().await.unwrap();
            }
        })
    });

    for joined in join_all(writers.chain(readers)).await {
        joined.unwrap();
    }

    for book in &books {
        let records = library.ledger_store.find_by_book(book.book_id).await.unwrap();
        assert_eq!(records.len(), 10);
        assert!(records.iter().all(|b| b.returned_at.is_some()));
    }
    engine.check_consistency().await.unwrap();
}
