pub mod code_generator;
pub mod date;
pub mod jwt;
pub mod logging;
pub mod password;
pub mod validation;

pub use code_generator::{next_order_number, order_number_prefix};
pub use date::{day_end, day_start};
pub use jwt::*;
pub use logging::init_logger;
pub use password::*;
pub use validation::*;
