//! Application services orchestrating domain logic over ports.

mod astrix_service;

pub use astrix_service::{AstrixService, EMPTY_REPLY_PLACEHOLDER};
