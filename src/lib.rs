pub mod session;
pub mod sources;
