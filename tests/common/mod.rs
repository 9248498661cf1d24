#![allow(dead_code)]

use lending_ledger::adapters::memory::{CatalogStore, LedgerStore};
use lending_ledger::adapters::mock::IdentityProvider;
use lending_ledger::application::lending::{LendingEngine, ServiceDependencies};
use lending_ledger::domain::{Book, NewBook};
use lending_ledger::{LendingConfig, telemetry};
use std::sync::Arc;

/// テスト用の組み立て済み環境
///
/// ストアへの直接参照を保持し、不整合の注入や台帳の検査に使う。
pub struct TestLibrary {
    pub engine: LendingEngine,
    pub catalog_store: Arc<CatalogStore>,
    pub ledger_store: Arc<LedgerStore>,
    pub identity_provider: Arc<IdentityProvider>,
}

pub fn setup_library() -> TestLibrary {
    // 2回目以降の初期化は失敗するが無視してよい
    let _ = telemetry::init_tracing(&LendingConfig::from_env());

    let catalog_store = Arc::new(CatalogStore::new());
    let ledger_store = Arc::new(LedgerStore::new());
    let identity_provider = Arc::new(IdentityProvider::new());

    let engine = LendingEngine::new(ServiceDependencies {
        catalog_store: catalog_store.clone(),
        ledger_store: ledger_store.clone(),
        identity_provider: identity_provider.clone(),
    });

    TestLibrary {
        engine,
        catalog_store,
        ledger_store,
        identity_provider,
    }
}

/// カタログの初期データ
pub async fn add_sample_books(engine: &LendingEngine) -> Vec<Book> {
    let samples = vec![
        NewBook::new(
            "The Design of Everyday Things",
            "Don Norman",
            "978-0465050659",
        ),
        NewBook::new("Thinking, Fast and Slow", "Daniel Kahneman", "978-0374533557"),
        NewBook::new("Atomic Habits", "James Clear", "978-0735211292"),
        NewBook::new("The Innovators", "Walter Isaacson", "978-1476708706"),
    ];

    let mut books = Vec::new();
    for new_book in samples {
        books.push(engine.add_book(new_book).await.unwrap());
    }
    books
}
