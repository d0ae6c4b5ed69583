//! SEP-41 token access: pulls from subscribers, pushes out of the treasury.
//!
//! The token contract itself would reject a short allowance or balance by trapping.
//! Checking first lets callers see a typed [`Error`] instead of a host failure.

use crate::types::Error;
use soroban_sdk::{token, Address, Env};

/// Pulls `amount` from `from` into the contract using the allowance `from` granted
/// to the contract.
pub fn pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), Error> {
    let client = token::Client::new(env, token);
    let treasury = env.current_contract_address();

    if client.allowance(from, &treasury) < amount {
        return Err(Error::InsufficientAllowance);
    }
    if client.balance(from) < amount {
        return Err(Error::InsufficientBalance);
    }

    client.transfer_from(&treasury, from, &treasury, &amount);
    Ok(())
}

/// Sends `amount` of treasury funds to `to`.
pub fn push(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    let client = token::Client::new(env, token);
    let treasury = env.current_contract_address();

    if client.balance(&treasury) < amount {
        return Err(Error::InsufficientBalance);
    }

    client.transfer(&treasury, to, &amount);
    Ok(())
}

pub fn treasury_balance(env: &Env, token: &Address) -> i128 {
    token::Client::new(env, token).balance(&env.current_contract_address())
}
