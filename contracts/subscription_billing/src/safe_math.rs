//! Checked arithmetic for timestamps, counters and token amounts.

use crate::types::Error;

/// Returns the timestamp at which the next interval becomes payable.
///
/// Uses `checked_add()` so a huge `interval` yields `Error::Overflow` instead of
/// wrapping to a timestamp in the past, which would make the subscriber due forever.
///
/// # Arguments
///
/// * `last_charged_at` - Start of the interval most recently paid for
/// * `interval` - Billing interval in seconds
///
/// # Returns
///
/// * `Ok(u64)` - `last_charged_at + interval`
/// * `Err(Error::Overflow)` - If the sum exceeds `u64::MAX`
///
/// # Examples
///
/// ```ignore
/// assert_eq!(next_due_at(1_000, 60), Ok(1_060));
/// assert_eq!(next_due_at(u64::MAX, 1), Err(Error::Overflow));
/// ```
pub fn next_due_at(last_charged_at: u64, interval: u64) -> Result<u64, Error> {
    last_charged_at.checked_add(interval).ok_or(Error::Overflow)
}

/// Increments a payment counter, preventing wrap-around.
pub fn increment_count(count: u32) -> Result<u32, Error> {
    count.checked_add(1).ok_or(Error::Overflow)
}

/// Validates that a token amount is strictly positive.
///
/// Used for input validation on withdrawals and on the configured price, where a
/// zero or negative amount is never meaningful.
///
/// # Returns
///
/// * `Ok(())` - If `amount > 0`
/// * `Err(Error::InvalidAmount)` - Otherwise
pub fn validate_positive(amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        Err(Error::InvalidAmount)
    } else {
        Ok(())
    }
}
