//! Login sessions keyed by the caller's address.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

const SESSION_KEY: Symbol = symbol_short!("SESS");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

/// Kind of principal a session was opened for.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum UserType {
    Ministry = 1,
    HospitalAdmin = 2,
}

/// A live login.
///
/// `subject_id` is the account row that authenticated and `tenant_id` the
/// scope it acts within: for a ministry both are the ministry id, for a
/// hospital admin they are the admin id and its hospital id.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthSession {
    pub user: Address,
    pub user_type: UserType,
    pub subject_id: u64,
    pub tenant_id: u64,
    pub display_name: String,
    pub issued_at: u64,
    pub expires_at: u64,
}

impl AuthSession {
    pub fn is_live(&self, now: u64) -> bool {
        now < self.expires_at
    }
}

fn session_storage_key(user: &Address) -> (Symbol, Address) {
    (SESSION_KEY, user.clone())
}

fn extend_session_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Opens a session for `user`, replacing any previous one.
pub fn start_session(
    env: &Env,
    user: &Address,
    user_type: UserType,
    subject_id: u64,
    tenant_id: u64,
    display_name: String,
    ttl_seconds: u64,
) -> AuthSession {
    let now = env.ledger().timestamp();
    let key = session_storage_key(user);
    let session = AuthSession {
        user: user.clone(),
        user_type,
        subject_id,
        tenant_id,
        display_name,
        issued_at: now,
        expires_at: now.saturating_add(ttl_seconds),
    };
    env.storage().persistent().set(&key, &session);
    extend_session_ttl(env, &key);
    session
}

/// Returns the caller's session if it has not expired.
pub fn get_session(env: &Env, user: &Address) -> Option<AuthSession> {
    let key = session_storage_key(user);
    let session: AuthSession = env.storage().persistent().get(&key)?;
    if !session.is_live(env.ledger().timestamp()) {
        return None;
    }
    extend_session_ttl(env, &key);
    Some(session)
}

/// Removes the caller's session, returning what was there (live or not).
pub fn end_session(env: &Env, user: &Address) -> Option<AuthSession> {
    let key = session_storage_key(user);
    let session: Option<AuthSession> = env.storage().persistent().get(&key);
    if session.is_some() {
        env.storage().persistent().remove(&key);
    }
    session
}
