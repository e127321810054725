//! Persistent entity definitions.
//!
//! `NAMESPACE` and `registered()` stand in for a package scan: the session
//! factory only hands out repositories for entities listed here.

pub mod example;

pub use example::Entity as Examples;
pub use example::Model as ExampleRow;

use crate::orm::session::EntityDescriptor;

pub const NAMESPACE: &str = "example_web::entities";

pub fn registered() -> Vec<EntityDescriptor> {
    vec![EntityDescriptor::of::<example::Entity>(NAMESPACE)]
}
