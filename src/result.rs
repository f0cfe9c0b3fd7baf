//! Result type used throughout version-roller.
//!
//! Errors are `color_eyre` reports. Classified failures (see
//! [`crate::error::RollerError`]) travel inside the report and can be
//! recovered with `downcast_ref`.
//!
//! ```rust,ignore
//! use color_eyre::eyre::Context;
//! use crate::result::Result;
//!
//! fn current_branch(exec: &dyn Executor) -> Result<String> {
//!     get_current_branch(exec, &ExecOptions::default())
//!         .wrap_err("failed to read current branch")
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Standard result type, an alias for `color_eyre::eyre::Result<T>`.
pub type Result<T> = EyreResult<T>;
