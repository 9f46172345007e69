// patternstore-common: shared types and the management-session protocol.

pub mod protocol;
pub mod types;
