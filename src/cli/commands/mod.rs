//! Subcommands of the `ttt-qlearn` binary

pub mod evaluate;
pub mod inspect;
pub mod train;
