pub mod handlers;
pub mod locator;
pub mod models;
pub mod repository;
pub mod selector;

pub use handlers::*;
pub use locator::*;
pub use models::*;
pub use repository::*;
pub use selector::*;
