//! Subscriber lifecycle: subscribe, cancel, and the slot array behind them.
//!
//! **PRs that only change subscriber lifecycle or slot bookkeeping should edit this file only.**
//!
//! # Slot array
//!
//! Every subscription gets the next slot index on signup. Cancelling removes the
//! slot entry instead of compacting, so indices held by off-chain callers never
//! shift. Slots are never reused: re-subscribing after a cancel appends a new one.

use crate::admin::{bump_instance, get_config, require_subscriber_or_owner};
use crate::token_gateway;
use crate::types::{
    CancelledEvent, DataKey, Error, SubscribedEvent, SubscriberRecord, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};
use soroban_sdk::{symbol_short, Address, Env, Symbol};

pub fn slot_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::SlotCount)
        .unwrap_or(0)
}

/// Returns the subscriber in slot `index`, or `None` for a tombstone or an index
/// that was never assigned.
pub fn slot_at(env: &Env, index: u32) -> Option<Address> {
    env.storage().persistent().get(&DataKey::Slot(index))
}

pub fn load_record(env: &Env, subscriber: &Address) -> Option<SubscriberRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Subscriber(subscriber.clone()))
}

/// Writes a record and keeps both it and its slot entry alive.
pub fn save_record(env: &Env, subscriber: &Address, record: &SubscriberRecord) {
    let key = DataKey::Subscriber(subscriber.clone());
    let persistent = env.storage().persistent();
    persistent.set(&key, record);
    persistent.extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);

    let slot_key = DataKey::Slot(record.slot);
    if persistent.has(&slot_key) {
        persistent.extend_ttl(&slot_key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    }
}

fn append_slot(env: &Env, subscriber: &Address) -> Result<u32, Error> {
    let index = slot_count(env);
    let next = index.checked_add(1).ok_or(Error::Overflow)?;

    let key = DataKey::Slot(index);
    env.storage().persistent().set(&key, subscriber);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);

    env.storage().instance().set(&DataKey::SlotCount, &next);
    bump_instance(env);
    Ok(index)
}

/// Signs `subscriber` up and charges the first interval immediately.
///
/// # Errors
/// * `AlreadySubscribed` - a record already exists for `subscriber`
/// * `InsufficientAllowance` / `InsufficientBalance` - the signup pull failed
pub fn do_subscribe(env: &Env, subscriber: Address) -> Result<SubscriberRecord, Error> {
    subscriber.require_auth();
    let config = get_config(env)?;

    if load_record(env, &subscriber).is_some() {
        return Err(Error::AlreadySubscribed);
    }

    token_gateway::pull(env, &config.token, &subscriber, config.price)?;

    let slot = append_slot(env, &subscriber)?;
    let record = SubscriberRecord {
        slot,
        last_charged_at: env.ledger().timestamp(),
        payment_count: 1,
    };
    save_record(env, &subscriber, &record);

    env.events().publish(
        (Symbol::new(env, "subscribed"), subscriber.clone()),
        SubscribedEvent {
            subscriber,
            slot,
            amount: config.price,
        },
    );
    Ok(record)
}

/// Removes `target`'s subscription and tombstones its slot.
///
/// The token allowance the subscriber granted is left untouched; revoking it is
/// up to the subscriber.
pub fn do_cancel_subscription(env: &Env, caller: Address, target: Address) -> Result<(), Error> {
    require_subscriber_or_owner(env, &caller, &target)?;

    let record = load_record(env, &target).ok_or(Error::UserNotFound)?;

    env.storage()
        .persistent()
        .remove(&DataKey::Subscriber(target.clone()));
    env.storage().persistent().remove(&DataKey::Slot(record.slot));

    env.events().publish(
        (symbol_short!("cancelled"), target.clone()),
        CancelledEvent {
            subscriber: target,
            slot: record.slot,
            cancelled_by: caller,
        },
    );
    Ok(())
}
