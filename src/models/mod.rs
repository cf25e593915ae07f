pub mod auth;
pub mod cash_register;
pub mod collection;
pub mod common;
pub mod customer;
pub mod delivery;
pub mod expense;
pub mod inventory;
pub mod loyalty;
pub mod order;
pub mod pagination;
pub mod product;
pub mod promotion;
pub mod report;
pub mod settings;

pub use auth::*;
pub use cash_register::*;
pub use collection::*;
pub use common::*;
pub use customer::*;
pub use delivery::*;
pub use expense::*;
pub use inventory::*;
pub use loyalty::*;
pub use order::*;
pub use pagination::*;
pub use product::*;
pub use promotion::*;
pub use report::*;
pub use settings::*;
