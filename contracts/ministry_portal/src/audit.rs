//! Append-only audit trail.
//!
//! Appends go through an [`AuditSink`]. Callers use [`record`], which never
//! fails: a rejected append is logged, counted and published as `AUD_FAIL`,
//! and the business operation carries on.

use crate::config;
use crate::events;
use crate::storage::{self, KIND_AUDIT};
use crate::types::{ActorType, AuditLog, RequestOrigin};
use soroban_sdk::{log, Env, Map, String, Symbol, Vec};

pub const MINISTRY_LOGIN: &str = "ministry_login";
pub const MINISTRY_LOGOUT: &str = "ministry_logout";
pub const HOSPITAL_CREATED: &str = "hospital_created";
pub const HOSPITAL_ACTIVATED: &str = "hospital_activated";
pub const HOSPITAL_DEACTIVATED: &str = "hospital_deactivated";
pub const HOSPITAL_ADMIN_LOGIN: &str = "hadmin_login";
pub const DOCTOR_REGISTERED: &str = "doctor_registered";
pub const PATIENT_REGISTERED: &str = "patient_registered";
pub const ENCOUNTER_RECORDED: &str = "encounter_recorded";

pub const MAX_DETAIL_ENTRIES: u32 = 16;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AuditError {
    /// The sink's configured capacity is used up.
    LogFull = 1,
    DetailsTooLarge = 2,
}

/// An audit record before it has been assigned an id and timestamp.
#[derive(Clone, Debug)]
pub struct AuditEntry {
    pub actor_type: ActorType,
    pub actor_id: Option<u64>,
    pub action: Symbol,
    pub details: Map<Symbol, String>,
    pub patient_id: Option<u64>,
    pub hospital_id: Option<u64>,
    pub origin: Option<RequestOrigin>,
}

impl AuditEntry {
    pub fn new(env: &Env, actor_type: ActorType, actor_id: Option<u64>, action: &str) -> Self {
        AuditEntry {
            actor_type,
            actor_id,
            action: Symbol::new(env, action),
            details: Map::new(env),
            patient_id: None,
            hospital_id: None,
            origin: None,
        }
    }

    pub fn hospital(mut self, hospital_id: u64) -> Self {
        self.hospital_id = Some(hospital_id);
        self
    }

    pub fn patient(mut self, patient_id: u64) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn detail(mut self, key: Symbol, value: String) -> Self {
        self.details.set(key, value);
        self
    }

    pub fn origin(mut self, origin: &RequestOrigin) -> Self {
        self.origin = Some(origin.clone());
        self
    }
}

pub trait AuditSink {
    /// Persists the entry and returns its id.
    fn append(&self, env: &Env, entry: &AuditEntry) -> Result<u64, AuditError>;
}

/// Stores records in contract storage under monotonic ids.
pub struct LedgerAuditSink {
    /// 0 means unbounded.
    pub capacity: u64,
}

impl LedgerAuditSink {
    pub fn from_config(env: &Env) -> Self {
        LedgerAuditSink {
            capacity: config::load(env).audit_capacity,
        }
    }
}

impl AuditSink for LedgerAuditSink {
    fn append(&self, env: &Env, entry: &AuditEntry) -> Result<u64, AuditError> {
        if self.capacity != 0 && storage::last_id(env, &KIND_AUDIT) >= self.capacity {
            return Err(AuditError::LogFull);
        }
        if entry.details.len() > MAX_DETAIL_ENTRIES {
            return Err(AuditError::DetailsTooLarge);
        }

        let id = storage::next_id(env, &KIND_AUDIT);
        let (ip_address, user_agent) = match &entry.origin {
            Some(origin) => (origin.ip_address.clone(), origin.user_agent.clone()),
            None => (None, None),
        };
        let record = AuditLog {
            id,
            acting_user_type: entry.actor_type,
            acting_user_id: entry.actor_id,
            patient_id: entry.patient_id,
            hospital_id: entry.hospital_id,
            action: entry.action.clone(),
            details: entry.details.clone(),
            ip_address,
            user_agent,
            created_at: env.ledger().timestamp(),
        };
        storage::insert_audit_log(env, &record);
        index_record(env, &record);
        events::publish_audit_appended(env, id, entry.action.clone());
        Ok(id)
    }
}

/// Appends through the configured ledger sink. Never fails.
pub fn record(env: &Env, entry: AuditEntry) -> Option<u64> {
    let sink = LedgerAuditSink::from_config(env);
    record_with(env, &sink, entry)
}

pub fn record_with<S: AuditSink>(env: &Env, sink: &S, entry: AuditEntry) -> Option<u64> {
    match sink.append(env, &entry) {
        Ok(id) => Some(id),
        Err(err) => {
            let failures = storage::bump_audit_failures(env);
            log!(env, "audit log error", entry.action, err as u32);
            events::publish_audit_failed(env, entry.action, err as u32, failures);
            None
        }
    }
}

/// Files a stored record under the id lists the viewers read.
///
/// A record is visible to a ministry when any ministry performed it, or when
/// it is linked to one of the ministry's hospitals. Ministry-actor records
/// go to one shared list and the rest to their owning ministry's list, so the
/// two lists a viewer merges never overlap.
fn index_record(env: &Env, record: &AuditLog) {
    if record.acting_user_type == ActorType::Ministry {
        storage::index_ministry_actor_audit(env, record.id);
    } else if let Some(hospital) = record
        .hospital_id
        .and_then(|hospital_id| storage::get_hospital(env, hospital_id))
    {
        storage::index_ministry_audit(env, hospital.ministry_id, record.id);
    }
    if let Some(hospital_id) = record.hospital_id {
        storage::index_hospital_audit(env, hospital_id, record.id);
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

/// Merges two ascending, disjoint id lists newest first, skipping `offset`
/// ids and loading at most `limit` records.
fn merge_newest_first(
    env: &Env,
    a: &Vec<u64>,
    b: &Vec<u64>,
    offset: u32,
    limit: u32,
) -> Vec<AuditLog> {
    let mut items = Vec::new(env);
    let (mut i, mut j) = (a.len(), b.len());
    let mut skipped: u32 = 0;
    while items.len() < limit {
        let next_a = if i > 0 { a.get(i - 1) } else { None };
        let next_b = if j > 0 { b.get(j - 1) } else { None };
        let id = match (next_a, next_b) {
            (Some(x), Some(y)) if x > y => {
                i -= 1;
                x
            }
            (Some(x), None) => {
                i -= 1;
                x
            }
            (_, Some(y)) => {
                j -= 1;
                y
            }
            (None, None) => break,
        };
        if skipped < offset {
            skipped += 1;
            continue;
        }
        if let Some(record) = storage::get_audit_log(env, id) {
            items.push_back(record);
        }
    }
    items
}

pub fn recent_for_ministry(env: &Env, ministry_id: u64, limit: u32) -> Vec<AuditLog> {
    page_for_ministry(env, ministry_id, 0, limit).0
}

/// One page of the ministry-scoped trail plus the total number of matches.
pub fn page_for_ministry(
    env: &Env,
    ministry_id: u64,
    offset: u32,
    limit: u32,
) -> (Vec<AuditLog>, u32) {
    let shared = storage::ministry_actor_audit_ids(env);
    let own = storage::ministry_audit_ids(env, ministry_id);
    let total = shared.len() + own.len();
    (merge_newest_first(env, &shared, &own, offset, limit), total)
}

pub fn recent_for_hospital(env: &Env, hospital_id: u64, limit: u32) -> Vec<AuditLog> {
    let ids = storage::hospital_audit_ids(env, hospital_id);
    merge_newest_first(env, &ids, &Vec::new(env), 0, limit)
}
