//! Utility Module
//!
//! Cross-cutting helpers shared by the whole server:
//! - [`error`] - application error type and response envelope
//! - [`result`] - common Result aliases
//! - [`logger`] - tracing setup
//! - [`validation`] - text length limits and checks

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
