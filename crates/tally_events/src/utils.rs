//! Small shared helpers.

/// Returns the current Unix timestamp in seconds.
///
/// All event constructors stamp themselves through this function so
/// timestamps are generated consistently across the system.
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}
