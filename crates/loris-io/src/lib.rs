#![doc = include_str!("../README.md")]

pub mod corpus_files;
pub mod error;
pub mod retained;

pub use corpus_files::{load_round, RoundInputs};
pub use error::FileError;
pub use retained::{parse_retained, read_retained_file, write_retained_file};
