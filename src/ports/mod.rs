//! Ports (trait boundaries) between the training core and its collaborators.

pub mod observer;

pub use observer::Observer;
