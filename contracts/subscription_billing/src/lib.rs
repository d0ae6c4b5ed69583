//! Recurring subscription billing on Soroban.
//!
//! Subscribers approve the contract to spend a SEP-41 token, then `subscribe`,
//! paying the first interval on the spot. Once per `interval` the contract pulls
//! `price` from every active subscriber, either when the owner calls
//! `execute_payment` or when an automation keeper runs `check_upkeep` and
//! `perform_upkeep`. Collected funds stay in the contract until the owner withdraws.
//!
//! ## Storage Strategy
//! - `instance()`: owner, [`BillingConfig`] and the slot count.
//! - `persistent()`: one [`SubscriberRecord`] per active subscriber and one entry
//!   per live slot, bumped whenever the subscriber is charged.
//!
//! `get_payment_targets`, `get_due_subscribers` and `check_upkeep` read two
//! persistent entries per slot (slot and record), tombstones included. The
//! per-transaction read footprint limit therefore caps a scan at a few dozen
//! slots; past that, keepers and owners should read slots with `get_slot`.
//!
//! ## Subscriber lifecycle
//!
//!   (absent) --subscribe-->  Active(last_charged_at = now, payment_count = 1)
//!   Active   --charge-->     Active(last_charged_at += interval, payment_count += 1)
//!   Active   --cancel-->     (absent), slot tombstoned
//!
//! Whether an active subscriber is due is derived from the ledger time on every
//! read and charge; it is never stored.
#![no_std]

mod admin;
mod charge_core;
mod keeper;
mod queries;
mod safe_math;
mod subscription;
mod token_gateway;
mod types;

use soroban_sdk::{contract, contractimpl, Address, Bytes, Env, Vec};

pub use queries::compute_next_payment_info;
pub use types::{
    BillingConfig, CancelledEvent, DataKey, Error, NextPaymentInfo, PaymentChargedEvent,
    SubscribedEvent, SubscriberRecord, WithdrawnEvent,
};

#[contract]
pub struct SubscriptionBilling;

#[contractimpl]
impl SubscriptionBilling {
    /// Initialize the contract once with its owner and fixed billing parameters.
    ///
    /// # Arguments
    /// * `owner` - Address allowed to charge directly, withdraw and rotate ownership
    /// * `token` - SEP-41 token pulled from subscribers
    /// * `price` - Amount charged per interval, in the token's smallest unit (> 0)
    /// * `interval` - Billing interval in seconds (> 0)
    pub fn init(
        env: Env,
        owner: Address,
        token: Address,
        price: i128,
        interval: u64,
    ) -> Result<(), Error> {
        admin::do_init(&env, owner, token, price, interval)
    }

    /// Subscribe the caller and charge the first interval immediately.
    ///
    /// The subscriber must have approved the contract for at least `price`; an
    /// unlimited allowance avoids re-approving every interval.
    pub fn subscribe(env: Env, subscriber: Address) -> Result<SubscriberRecord, Error> {
        subscription::do_subscribe(&env, subscriber)
    }

    /// Cancel `target`'s subscription. Callable by `target` or the owner.
    pub fn cancel_subscription(env: Env, caller: Address, target: Address) -> Result<(), Error> {
        subscription::do_cancel_subscription(&env, caller, target)
    }

    /// Owner-triggered billing: charge one interval to every address in `targets`.
    ///
    /// All-or-nothing. The first target that is unknown (`UserNotFound`), not yet
    /// due (`AlreadyPaid`) or unable to pay aborts the whole call and no target is
    /// charged. Filter with [`Self::get_payment_targets`] first.
    pub fn execute_payment(env: Env, caller: Address, targets: Vec<Address>) -> Result<(), Error> {
        admin::require_owner(&env, &caller)?;
        charge_core::charge_batch(&env, &targets)
    }

    /// One entry per slot: the subscriber if the slot is live and due, `None` otherwise.
    pub fn get_payment_targets(env: Env) -> Result<Vec<Option<Address>>, Error> {
        charge_core::payment_targets(&env)
    }

    /// Due subscribers in slot order, without the `None` padding.
    pub fn get_due_subscribers(env: Env) -> Result<Vec<Address>, Error> {
        charge_core::due_subscribers(&env)
    }

    /// Keeper poll: `(true, descriptor)` when at least one subscriber is due.
    pub fn check_upkeep(env: Env, check_data: Bytes) -> Result<(bool, Bytes), Error> {
        keeper::check_upkeep(&env, check_data)
    }

    /// Keeper execution of a descriptor returned by [`Self::check_upkeep`]. Open to anyone.
    pub fn perform_upkeep(env: Env, perform_data: Bytes) -> Result<(), Error> {
        keeper::perform_upkeep(&env, perform_data)
    }

    /// Send `amount` of collected funds to the owner.
    pub fn withdraw_token(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        admin::do_withdraw_token(&env, caller, amount)
    }

    /// Rotate the owner. Only callable by the current owner.
    ///
    /// The old owner loses access immediately, including direct `execute_payment`
    /// and `withdraw_token`. There is no way back without the new owner.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        admin::do_transfer_ownership(&env, caller, new_owner)
    }

    pub fn get_subscriber(env: Env, subscriber: Address) -> Result<SubscriberRecord, Error> {
        queries::get_subscriber(&env, &subscriber)
    }

    /// Subscriber in slot `index`, `None` for a cancelled or unassigned slot.
    pub fn get_slot(env: Env, index: u32) -> Option<Address> {
        subscription::slot_at(&env, index)
    }

    /// Number of slots ever assigned, tombstones included.
    pub fn get_slot_count(env: Env) -> u32 {
        subscription::slot_count(&env)
    }

    pub fn get_next_payment_info(env: Env, subscriber: Address) -> Result<NextPaymentInfo, Error> {
        queries::get_next_payment_info(&env, &subscriber)
    }

    pub fn get_config(env: Env) -> Result<BillingConfig, Error> {
        admin::get_config(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, Error> {
        admin::get_owner(&env)
    }

    /// Token balance held by the contract.
    pub fn get_treasury_balance(env: Env) -> Result<i128, Error> {
        queries::get_treasury_balance(&env)
    }
}
