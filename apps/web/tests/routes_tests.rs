// HTTP routes and middleware tests
//
// Every test runs the full route table against its own seeded embedded
// database.
//
// Run all routes tests:
//   cargo test --test routes_tests
//
// Run specific routes tests:
//   cargo test --test routes_tests routes::examples_api::

mod common;
mod support;

#[path = "suites/routes/mod.rs"]
mod routes;
