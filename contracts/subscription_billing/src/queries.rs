//! Read-only helpers: subscriber records, next payment info, treasury balance.
//!
//! **PRs that only add or change read-only/query behavior should edit this file only.**

use crate::admin::get_config;
use crate::safe_math::next_due_at;
use crate::subscription::load_record;
use crate::token_gateway;
use crate::types::{BillingConfig, Error, NextPaymentInfo, SubscriberRecord};
use soroban_sdk::{Address, Env};

pub fn get_subscriber(env: &Env, subscriber: &Address) -> Result<SubscriberRecord, Error> {
    load_record(env, subscriber).ok_or(Error::UserNotFound)
}

/// Computes when `record` next becomes payable.
///
/// This is a readonly helper that does not mutate contract state. Off-chain
/// schedulers use it to decide when to call `execute_payment` for one subscriber
/// without scanning the whole slot array.
pub fn compute_next_payment_info(
    now: u64,
    record: &SubscriberRecord,
    config: &BillingConfig,
) -> NextPaymentInfo {
    match next_due_at(record.last_charged_at, config.interval) {
        Ok(next_payment_at) => NextPaymentInfo {
            next_payment_at,
            is_due: now >= next_payment_at,
        },
        // Past the end of representable time: never payable.
        Err(_) => NextPaymentInfo {
            next_payment_at: u64::MAX,
            is_due: false,
        },
    }
}

pub fn get_next_payment_info(env: &Env, subscriber: &Address) -> Result<NextPaymentInfo, Error> {
    let config = get_config(env)?;
    let record = get_subscriber(env, subscriber)?;
    Ok(compute_next_payment_info(
        env.ledger().timestamp(),
        &record,
        &config,
    ))
}

pub fn get_treasury_balance(env: &Env) -> Result<i128, Error> {
    let config = get_config(env)?;
    Ok(token_gateway::treasury_balance(env, &config.token))
}
