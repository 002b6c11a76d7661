//! Common utilities for tests

#![allow(dead_code)]

use std::sync::Arc;

use quark::{DirEntry, Options, Packing, RamDisk, Session};

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr) => {
        println!("{}[test] {}{}", crate::common::ORANGE, $msg, crate::common::RESET)
    };
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
}

pub fn session(packing: Packing) -> Session {
    Session::in_memory(Arc::new(RamDisk::new()), Options { packing }).unwrap()
}

pub fn names(entries: &[DirEntry]) -> Vec<String> {
    entries.iter().map(DirEntry::name).collect()
}
