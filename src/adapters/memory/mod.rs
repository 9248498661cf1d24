pub mod catalog_store;
pub mod error;
pub mod ledger_store;

pub use catalog_store::CatalogStore;
pub use error::MemoryStoreError;
pub use ledger_store::LedgerStore;
