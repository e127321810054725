//! Domain-level repositories built on the generic CRUD repository.

pub mod examples;
