pub mod indicators;
pub mod session;
