//! Helper macros used across the relay crate.

/// Returns early with an error when a condition does not hold.
///
/// Like `assert!`, but yields `Err($error)` from the enclosing function instead of panicking.
///
/// ```ignore
/// ensure!(!name.is_empty(), RelayError::invalid_message("name must not be empty"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
