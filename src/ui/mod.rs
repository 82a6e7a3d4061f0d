//! UI module for consistent CLI output
//!
//! Uses `cliclack` for step output and prompts with automatic fallback to
//! plain text in CI/non-interactive environments, and an `indicatif`
//! spinner for long-running commands.

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, outro_warn, remark, section, step_error, step_error_detail,
    step_info, step_ok, step_ok_detail, step_warn, step_warn_hint,
};
pub use progress::TaskSpinner;
pub use prompts::{confirm, confirm_inline, read_line_inline};
