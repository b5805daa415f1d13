#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub use board::*;
pub use engine::*;
pub use error::*;
pub use history::*;
pub use insights::*;
pub use outcome::*;
pub use strategy::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod history;
mod insights;
mod outcome;
mod strategy;
mod types;
