//! Exit code constants for the squash CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown recipe)
//! - 2: Validation failure (skill, subagent, or dispatch rules; `check` errors)
//! - 3: Configuration error (malformed or invalid `squash.yaml`)
//! - 4: Write failure (artifact destination could not be written)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or a recipe that does not exist.
pub const USER_ERROR: i32 = 1;

/// Hard validation failure: nothing was written.
pub const VALIDATION_FAILURE: i32 = 2;

/// Configuration could not be read, merged, or validated.
pub const CONFIG_ERROR: i32 = 3;

/// Artifacts could not be written to the destination.
pub const WRITE_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            VALIDATION_FAILURE,
            CONFIG_ERROR,
            WRITE_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }
}
