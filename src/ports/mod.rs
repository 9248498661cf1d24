pub mod catalog_store;
pub mod identity_provider;
pub mod ledger_store;

pub use catalog_store::CatalogStore;
pub use identity_provider::IdentityProvider;
pub use ledger_store::LedgerStore;
