//! Database repositories for the agent.

pub mod contact;

pub use contact::PgContactStore;
