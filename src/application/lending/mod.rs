mod consistency;
mod errors;
mod lending_engine;
mod query;

pub use errors::{LendingError, Result};
pub use lending_engine::{LendingEngine, ServiceDependencies};
pub use query::{OpenBorrowing, QueryFacade};
