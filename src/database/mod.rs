pub mod error;
pub mod manager;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod repository;

pub use error::{StoreError, ValidationErrors};
pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{FavsStore, UserStore};
