//! Users domain: registration, lookup, and the user-existence port

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::User;

// Re-export repository types
pub use repository::{InMemoryUserRepository, PgUserRepository, UserDirectory};

// Re-export API types
pub use api::routes;
pub use api::UsersState;
