//! API endpoint integration tests
//!
//! Drives the composed router end to end against in-memory storage.

#![allow(dead_code)]

mod common;
mod conversations;
mod messages;
mod users;
