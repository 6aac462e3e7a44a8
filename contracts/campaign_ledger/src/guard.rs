//! Reentrancy guard.
//!
//! Every entry point that moves tokens holds a [`ReentrancyGuard`] for its
//! whole body. The lock lives in instance storage so a nested invocation of
//! the same contract instance observes it and is rejected with
//! [`Error::ReentrantCall`]. The lock is released when the guard is dropped;
//! if the invocation fails instead, the host rolls the flag back with the
//! rest of the transaction.

use soroban_sdk::Env;

use crate::storage;
use crate::Error;

pub struct ReentrancyGuard<'a> {
    env: &'a Env,
}

impl<'a> ReentrancyGuard<'a> {
    pub fn acquire(env: &'a Env) -> Result<Self, Error> {
        if storage::is_locked(env) {
            return Err(Error::ReentrantCall);
        }
        storage::set_locked(env, true);
        Ok(Self { env })
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        storage::set_locked(self.env, false);
    }
}
