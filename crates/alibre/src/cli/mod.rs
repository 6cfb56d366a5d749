//! CLI module for Alibre
//!
//! Each command lives in its own module and takes the resolved
//! [`context::AppContext`].

pub mod books;
pub mod config;
pub mod context;
pub mod error;
pub mod folder;
pub mod output;
pub mod read;
pub mod scan;
pub mod stats;
