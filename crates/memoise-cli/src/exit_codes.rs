//! Exit codes for the memoise CLI. Part of the command-line contract.

pub const SUCCESS: i32 = 0;
pub const INVALID_INPUT: i32 = 1; // Unusable arguments or the wrapped function failed
pub const INTERNAL_ERROR: i32 = 2; // Config error or unexpected failure
