//! Types shared by every gpar crate: the [`InternalError`] for compiler
//! bugs and the four-state [`Logic`] value of constant netlist bits.

#![warn(missing_docs)]

pub mod internal;
pub mod logic;

pub use internal::InternalError;
pub use logic::{Logic, NotABit};
