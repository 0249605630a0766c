// src/lib.rs

//! slotwatch: hosting signup counter watcher

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
