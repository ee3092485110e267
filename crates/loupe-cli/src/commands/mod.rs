//! Command implementations.
//!
//! - [`preview`] - Preview server with live reload
//! - [`check`] - Entry resolution and configuration report

pub mod check;
pub mod preview;

pub use check::execute as check_execute;
pub use preview::execute as preview_execute;
