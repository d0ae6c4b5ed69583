//! Admin and access control: init, owner checks, treasury withdrawal, ownership rotation.
//!
//! **PRs that only change who may call what should edit this file only.**

use crate::safe_math::validate_positive;
use crate::token_gateway;
use crate::types::{
    BillingConfig, DataKey, Error, WithdrawnEvent, INSTANCE_BUMP_AMOUNT,
    INSTANCE_LIFETIME_THRESHOLD,
};
use soroban_sdk::{symbol_short, Address, Env, Symbol};

pub fn do_init(
    env: &Env,
    owner: Address,
    token: Address,
    price: i128,
    interval: u64,
) -> Result<(), Error> {
    if env.storage().instance().has(&DataKey::Config) {
        return Err(Error::AlreadyInitialized);
    }
    owner.require_auth();
    if validate_positive(price).is_err() || interval == 0 {
        return Err(Error::InvalidConfig);
    }

    let config = BillingConfig {
        token,
        price,
        interval,
    };
    env.storage().instance().set(&DataKey::Owner, &owner);
    env.storage().instance().set(&DataKey::Config, &config);
    env.storage().instance().set(&DataKey::SlotCount, &0u32);
    bump_instance(env);

    env.events()
        .publish((symbol_short!("init"), owner), config);
    Ok(())
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_config(env: &Env) -> Result<BillingConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn get_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

/// Requires `caller` to have signed and to be the stored owner.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let owner = get_owner(env)?;
    if *caller != owner {
        return Err(Error::OwnerOnly);
    }
    Ok(())
}

/// Requires `caller` to have signed and to be either `subscriber` or the owner.
pub fn require_subscriber_or_owner(
    env: &Env,
    caller: &Address,
    subscriber: &Address,
) -> Result<(), Error> {
    caller.require_auth();
    let owner = get_owner(env)?;
    if caller != subscriber && *caller != owner {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

/// Moves `amount` from the treasury to the owner.
pub fn do_withdraw_token(env: &Env, caller: Address, amount: i128) -> Result<(), Error> {
    require_owner(env, &caller)?;
    validate_positive(amount)?;

    let config = get_config(env)?;
    token_gateway::push(env, &config.token, &caller, amount)?;

    env.events().publish(
        (symbol_short!("withdrawn"),),
        WithdrawnEvent {
            owner: caller,
            amount,
        },
    );
    Ok(())
}

/// Hands the owner role to `new_owner`. Takes effect immediately.
pub fn do_transfer_ownership(env: &Env, caller: Address, new_owner: Address) -> Result<(), Error> {
    require_owner(env, &caller)?;

    env.storage().instance().set(&DataKey::Owner, &new_owner);
    bump_instance(env);

    env.events().publish(
        (Symbol::new(env, "ownership_transferred"), caller.clone()),
        (caller, new_owner, env.ledger().timestamp()),
    );
    Ok(())
}
