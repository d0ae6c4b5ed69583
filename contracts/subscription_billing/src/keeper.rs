//! Automation entrypoints: check_upkeep and perform_upkeep.
//!
//! **PRs that only change the keeper protocol or its work descriptor should edit this file only.**
//!
//! Both entrypoints are open to any caller. `perform_upkeep` reaches the same
//! batch charge as the owner-only `execute_payment`; the due check inside the
//! charge is what makes that safe. A stale or replayed descriptor fails with
//! `AlreadyPaid` and never charges twice.
//!
//! The work descriptor is the XDR encoding of a `Vec<Address>`. Its layout is
//! walked before the host decodes it, since the host traps on bytes that are not
//! XDR at all; anything that is not exactly an address vector is rejected with
//! `InvalidWorkDescriptor`.

use crate::charge_core::{charge_batch, due_subscribers};
use crate::types::Error;
use soroban_sdk::xdr::{FromXdr, ToXdr};
use soroban_sdk::{Address, Bytes, Env, TryFromVal, Val, Vec};

const SCV_VEC: u32 = 16;
const SCV_ADDRESS: u32 = 18;
const SC_ADDRESS_TYPE_ACCOUNT: u32 = 0;
const SC_ADDRESS_TYPE_CONTRACT: u32 = 1;
const PUBLIC_KEY_TYPE_ED25519: u32 = 0;
const KEY_LEN: u32 = 32;

fn read_u32(data: &Bytes, at: u32) -> Option<u32> {
    let end = at.checked_add(4)?;
    if end > data.len() {
        return None;
    }
    let mut word = [0u8; 4];
    data.slice(at..end).copy_into_slice(&mut word);
    Some(u32::from_be_bytes(word))
}

/// Length of the `ScVal::Vec` of addresses at the start of `data`, or `None` if
/// the bytes do not follow that layout.
fn address_vec_xdr_len(data: &Bytes) -> Option<u32> {
    // Tag, present flag of the optional vec, element count.
    if read_u32(data, 0)? != SCV_VEC || read_u32(data, 4)? != 1 {
        return None;
    }
    let count = read_u32(data, 8)?;

    let mut at = 12u32;
    for _ in 0..count {
        if read_u32(data, at)? != SCV_ADDRESS {
            return None;
        }
        let kind_at = at.checked_add(4)?;
        at = match read_u32(data, kind_at)? {
            SC_ADDRESS_TYPE_ACCOUNT => {
                if read_u32(data, kind_at.checked_add(4)?)? != PUBLIC_KEY_TYPE_ED25519 {
                    return None;
                }
                kind_at.checked_add(8 + KEY_LEN)?
            }
            SC_ADDRESS_TYPE_CONTRACT => kind_at.checked_add(4 + KEY_LEN)?,
            _ => return None,
        };
        if at > data.len() {
            return None;
        }
    }
    Some(at)
}

pub fn encode_work(env: &Env, targets: &Vec<Address>) -> Bytes {
    targets.clone().to_xdr(env)
}

/// Decodes a work descriptor, checking every element is an address.
pub fn decode_work(env: &Env, perform_data: &Bytes) -> Result<Vec<Address>, Error> {
    if address_vec_xdr_len(perform_data) != Some(perform_data.len()) {
        return Err(Error::InvalidWorkDescriptor);
    }
    let raw = Vec::<Val>::from_xdr(env, perform_data).map_err(|_| Error::InvalidWorkDescriptor)?;

    let mut targets = Vec::new(env);
    for val in raw.iter() {
        let target = Address::try_from_val(env, &val).map_err(|_| Error::InvalidWorkDescriptor)?;
        targets.push_back(target);
    }
    Ok(targets)
}

/// Reports whether any subscriber is due, along with the descriptor to pass to
/// [`perform_upkeep`]. `check_data` is accepted for protocol compatibility and ignored.
pub fn check_upkeep(env: &Env, _check_data: Bytes) -> Result<(bool, Bytes), Error> {
    let due = due_subscribers(env)?;
    Ok((!due.is_empty(), encode_work(env, &due)))
}

pub fn perform_upkeep(env: &Env, perform_data: Bytes) -> Result<(), Error> {
    let targets = decode_work(env, &perform_data)?;
    charge_batch(env, &targets)
}
