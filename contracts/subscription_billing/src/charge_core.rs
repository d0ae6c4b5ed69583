//! Due-date computation and interval charging (no auth). Used by execute_payment and the keeper.
//!
//! **PRs that only change how a subscriber is charged should edit this file only.**
//!
//! # Exactly-once charging
//!
//! A charge advances `last_charged_at` by exactly one interval, never to "now".
//! The due check (`now >= last_charged_at + interval`) is the only guard: of two
//! invocations racing for the same interval, the one applied second sees the
//! advanced timestamp and fails with [`Error::AlreadyPaid`]. A subscriber who
//! missed several intervals stays due and is charged once per call until caught up.
//!
//! # Batches
//!
//! [`charge_batch`] stops at the first failing target and returns its error. The
//! host then discards every write and token transfer the invocation made, so a
//! batch is charged completely or not at all.

use crate::admin::get_config;
use crate::safe_math::{increment_count, next_due_at};
use crate::subscription::{load_record, save_record, slot_at, slot_count};
use crate::token_gateway;
use crate::types::{BillingConfig, Error, PaymentChargedEvent, SubscriberRecord};
use soroban_sdk::{symbol_short, Address, Env, Vec};

/// Whether `record` is payable at `now`.
pub fn is_due(now: u64, record: &SubscriberRecord, config: &BillingConfig) -> Result<bool, Error> {
    Ok(now >= next_due_at(record.last_charged_at, config.interval)?)
}

/// Scans every slot once and returns a vector aligned with the slot array.
///
/// Position `i` holds the subscriber in slot `i` if that slot is live and due,
/// `None` otherwise. A record whose next due time overflows is never due.
pub fn payment_targets(env: &Env) -> Result<Vec<Option<Address>>, Error> {
    let config = get_config(env)?;
    let now = env.ledger().timestamp();

    let mut targets = Vec::new(env);
    for index in 0..slot_count(env) {
        let target = slot_at(env, index).filter(|subscriber| {
            load_record(env, subscriber)
                .map(|record| matches!(is_due(now, &record, &config), Ok(true)))
                .unwrap_or(false)
        });
        targets.push_back(target);
    }
    Ok(targets)
}

/// [`payment_targets`] with tombstones and not-yet-due slots dropped.
pub fn due_subscribers(env: &Env) -> Result<Vec<Address>, Error> {
    let mut due = Vec::new(env);
    for target in payment_targets(env)?.iter().flatten() {
        due.push_back(target);
    }
    Ok(due)
}

/// Charges `subscriber` for the interval following `last_charged_at`.
///
/// Shared safety checks:
/// * Subscriber must be active (`UserNotFound`).
/// * The next interval must have started (`AlreadyPaid`).
/// * The token pull must succeed (`InsufficientAllowance`, `InsufficientBalance`).
pub fn charge_one(
    env: &Env,
    config: &BillingConfig,
    now: u64,
    subscriber: &Address,
) -> Result<(), Error> {
    let mut record = load_record(env, subscriber).ok_or(Error::UserNotFound)?;

    let due_at = next_due_at(record.last_charged_at, config.interval)?;
    if now < due_at {
        return Err(Error::AlreadyPaid);
    }
    let payment_count = increment_count(record.payment_count)?;

    token_gateway::pull(env, &config.token, subscriber, config.price)?;

    record.last_charged_at = due_at;
    record.payment_count = payment_count;
    save_record(env, subscriber, &record);

    env.events().publish(
        (symbol_short!("charged"), subscriber.clone()),
        PaymentChargedEvent {
            subscriber: subscriber.clone(),
            amount: config.price,
            last_charged_at: record.last_charged_at,
            payment_count: record.payment_count,
        },
    );
    Ok(())
}

/// Charges every target in order, aborting on the first failure.
pub fn charge_batch(env: &Env, targets: &Vec<Address>) -> Result<(), Error> {
    let config = get_config(env)?;
    let now = env.ledger().timestamp();

    for subscriber in targets.iter() {
        charge_one(env, &config, now, &subscriber)?;
    }
    Ok(())
}
