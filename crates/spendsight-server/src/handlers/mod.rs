//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod budgets;
pub mod expenses;
pub mod salary;
pub mod system;

// Re-export all handlers for use in router
pub use analytics::*;
pub use budgets::*;
pub use expenses::*;
pub use salary::*;
pub use system::*;
