//! Thin ORM wiring over sea-orm: the session factory that owns the bound
//! connection and the repository factory that hands out CRUD repositories.

pub mod repository;
pub mod session;

pub use repository::{CrudRepository, RepositoryFactory};
pub use session::{EntityDescriptor, SessionFactory};
