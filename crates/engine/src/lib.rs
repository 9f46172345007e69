// patternstore-engine: pattern storage and reconciliation, placeholder
// resolution, the search invocation adapter, and the management session.

pub mod bridge;
pub mod commands;
pub mod error;
pub mod resolver;
pub mod search;
pub mod session;
pub mod store;
pub mod ui;
