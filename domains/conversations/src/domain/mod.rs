//! Domain layer for the Conversations domain

pub mod entities;
pub mod matcher;
pub mod validation;
