//! Storage layer: repository traits with an in-memory implementation (the
//! default, and what the tests run against) and a Postgres implementation
//! for the identity and people tables.

pub mod memory;
pub mod postgres;
pub mod repos;

pub use memory::InMemoryStore;
pub use postgres::{PostgresIdentityStore, PostgresPeopleStore};
pub use repos::{AcademicsRepo, BillingRepo, IdentityRepo, PeopleRepo};
