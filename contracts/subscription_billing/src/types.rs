//! Contract types: errors, storage keys, billing records and event payloads.
//!
//! Kept in a separate module to reduce merge conflicts when editing the ledger,
//! the scheduler or the contract entrypoints.

use soroban_sdk::{contracterror, contracttype, Address};

/// Ledgers per day at ~5 s per ledger.
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance entries (owner, config, slot count) are bumped to ~30 days on write.
pub const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Subscriber and slot entries outlive several billing intervals between charges.
pub const PERSISTENT_BUMP_AMOUNT: u32 = 120 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - 7 * DAY_IN_LEDGERS;

/// Storage keys.
///
/// Instance keys (`Owner`, `Config`, `SlotCount`) hold small fixed config shared by
/// every call. Persistent keys (`Subscriber`, `Slot`) are one ledger entry per
/// subscriber and per live slot.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // --- instance() ---
    Owner,
    Config,
    /// Number of slots ever handed out, live or tombstoned.
    SlotCount,
    // --- persistent() ---
    /// Billing record keyed by subscriber address. Present iff the subscriber is active.
    Subscriber(Address),
    /// Live slot entry. A tombstoned slot has no entry.
    Slot(u32),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    /// `price` must be positive and `interval` non-zero.
    InvalidConfig = 3,
    /// The provided amount is zero or negative.
    InvalidAmount = 4,
    /// Arithmetic overflow on a timestamp or counter.
    Overflow = 5,
    /// Keeper perform data does not decode to a list of addresses.
    InvalidWorkDescriptor = 6,
    /// Caller is neither the subscriber nor the owner.
    Unauthorized = 401,
    /// Caller is not the contract owner.
    OwnerOnly = 403,
    /// No active subscription for the given address.
    UserNotFound = 404,
    AlreadySubscribed = 409,
    /// Charge attempted before `last_charged_at + interval`.
    AlreadyPaid = 1001,
    /// The subscriber has not approved the contract for at least `price`.
    InsufficientAllowance = 1002,
    /// The payer does not hold enough tokens.
    InsufficientBalance = 1003,
}

/// Billing parameters fixed at `init` and never mutated.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BillingConfig {
    /// SEP-41 token pulled from subscribers.
    pub token: Address,
    /// Amount charged per interval, in the token's smallest unit.
    pub price: i128,
    /// Billing interval in seconds.
    pub interval: u64,
}

/// Billing state of an active subscriber.
///
/// `last_charged_at` and `payment_count` change only through a successful charge.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriberRecord {
    /// Index of the subscriber's live slot.
    pub slot: u32,
    /// Start of the interval most recently paid for.
    pub last_charged_at: u64,
    /// Number of successful charges, the signup charge included.
    pub payment_count: u32,
}

/// Next-payment view of one subscriber, for off-chain schedulers and UIs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NextPaymentInfo {
    /// `last_charged_at + interval`.
    pub next_payment_at: u64,
    /// Whether the ledger time has reached `next_payment_at`.
    pub is_due: bool,
}

/// Event emitted when a subscriber signs up and pays the first interval.
#[contracttype]
#[derive(Clone, Debug)]
pub struct SubscribedEvent {
    pub subscriber: Address,
    pub slot: u32,
    pub amount: i128,
}

/// Event emitted when a subscription is removed.
#[contracttype]
#[derive(Clone, Debug)]
pub struct CancelledEvent {
    pub subscriber: Address,
    pub slot: u32,
    /// Subscriber or owner who cancelled.
    pub cancelled_by: Address,
}

/// Event emitted for every interval charge after signup.
#[contracttype]
#[derive(Clone, Debug)]
pub struct PaymentChargedEvent {
    pub subscriber: Address,
    pub amount: i128,
    pub last_charged_at: u64,
    pub payment_count: u32,
}

/// Event emitted when the owner withdraws from the treasury.
#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawnEvent {
    pub owner: Address,
    pub amount: i128,
}
