//! Terminal output for cache operations
//!
//! Uses `cliclack` log lines in interactive terminals and plain
//! `[OK]`/`[WARN]`/`[FAIL]` prefixed lines in CI, where the output ends up
//! in build logs. Cache errors print with their hint, as a warning when
//! the run can carry on.

mod context;
mod output;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, outro_warn, step_error, step_info, step_ok, step_ok_detail,
};
