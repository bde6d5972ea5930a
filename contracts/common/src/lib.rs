//! Shared utilities and error types for the ministry portal contracts.
//!
//! This crate provides:
//! - [`CommonError`]: standardised error codes shared by every contract.
//! - [`calendar`]: UTC civil dates derived from ledger timestamps.
//! - [`credentials`]: salted password hashing and random credential generation.
//! - [`session`]: ledger-resident login sessions keyed by caller address.
//!
//! Contract-specific errors can extend the range starting at code **100** and
//! above, ensuring no collisions with the common set.

#![cfg_attr(not(test), no_std)]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod calendar;
pub mod credentials;
pub mod session;

pub use calendar::*;
pub use credentials::*;
pub use session::*;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Standardised error codes shared by every portal contract.
///
/// # Code ranges
/// | Range   | Purpose                       |
/// |---------|-------------------------------|
/// | 1 – 9   | Lifecycle / initialisation    |
/// | 10 – 19 | Authentication & authorisation|
/// | 20 – 29 | Resource not found            |
/// | 30 – 39 | Validation / input            |
/// | 40 – 49 | Conflicts & contract state    |
/// | 100+    | Reserved for contract-specific |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    // ── Lifecycle (1–9) ──────────────────────────────────────
    /// The contract has not been initialised yet.
    NotInitialized = 1,

    /// The contract has already been initialised.
    /// Returned when `initialize` is called more than once.
    AlreadyInitialized = 2,

    // ── Auth (10–19) ─────────────────────────────────────────
    /// The caller is not the platform operator.
    Unauthorized = 3,

    /// Username/password pair did not match an active account.
    /// Does not say which half was wrong.
    InvalidCredentials = 10,

    /// No live session of the required principal type.
    NotAuthenticated = 11,

    // ── Validation (30–39) ───────────────────────────────────
    /// One or more input parameters are invalid.
    InvalidInput = 30,

    /// A calendar date does not exist.
    InvalidDate = 31,
}
