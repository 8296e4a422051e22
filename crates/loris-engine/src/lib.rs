#![doc = include_str!("../README.md")]

pub mod classify;
pub mod consistency;
pub mod error;
pub mod horndini;
pub mod sorcar;

pub use consistency::{first_violation, is_consistent, Violation};
pub use error::EngineError;
pub use horndini::{horndini, refine};
pub use sorcar::{reduce_all, reduce_first, reduce_greedy, reduce_minimal, reduce_minimal_with};
