//! Run state machine types

pub mod machine;

pub use machine::RunState;
