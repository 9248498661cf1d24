pub mod book;
pub mod borrowing;
pub mod commands;
pub mod errors;
pub mod value_objects;

pub use book::*;
pub use borrowing::{Borrowing, LOAN_PERIOD_DAYS, NewBorrowing};
pub use errors::*;
pub use value_objects::*;
