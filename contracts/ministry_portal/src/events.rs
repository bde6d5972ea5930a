use portal_common::UserType;
use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

/// Event published when the contract is initialized.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Event published when a ministry tenant is set up.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MinistryCreatedEvent {
    pub ministry_id: u64,
    pub name: String,
    pub timestamp: u64,
}

/// Event published on every successful login.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoginEvent {
    pub user: Address,
    pub user_type: UserType,
    pub subject_id: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HospitalCreatedEvent {
    pub hospital_id: u64,
    pub ministry_id: u64,
    pub code: String,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HospitalStatusEvent {
    pub hospital_id: u64,
    pub is_active: bool,
    pub cascaded: bool,
    pub timestamp: u64,
}

/// Event published when the collaborator interface adds a doctor, patient or
/// encounter row.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordAddedEvent {
    pub hospital_id: u64,
    pub record_id: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditFailedEvent {
    pub action: Symbol,
    pub error_code: u32,
    pub failures: u64,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let data = InitializedEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish((symbol_short!("INIT"),), data);
}

pub fn publish_config_updated(env: &Env, admin: Address) {
    env.events().publish((symbol_short!("CFG_SET"),), admin);
}

pub fn publish_ministry_created(env: &Env, ministry_id: u64, name: String) {
    let data = MinistryCreatedEvent {
        ministry_id,
        name,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish((symbol_short!("MIN_ADD"), ministry_id), data);
}

pub fn publish_ministry_status(env: &Env, ministry_id: u64, is_active: bool) {
    env.events()
        .publish((symbol_short!("MIN_STS"), ministry_id), is_active);
}

pub fn publish_login(env: &Env, user: Address, user_type: UserType, subject_id: u64) {
    let topics = (symbol_short!("LOGIN"), user.clone());
    let data = LoginEvent {
        user,
        user_type,
        subject_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_logout(env: &Env, user: Address) {
    env.events()
        .publish((symbol_short!("LOGOUT"), user), env.ledger().timestamp());
}

pub fn publish_hospital_created(env: &Env, hospital_id: u64, ministry_id: u64, code: String) {
    let data = HospitalCreatedEvent {
        hospital_id,
        ministry_id,
        code,
        timestamp: env.ledger().timestamp(),
    };
    env.events()
        .publish((symbol_short!("HOSP_ADD"), ministry_id), data);
}

pub fn publish_hospital_status(env: &Env, hospital_id: u64, is_active: bool, cascaded: bool) {
    let data = HospitalStatusEvent {
        hospital_id,
        is_active,
        cascaded,
        timestamp: env.ledger().timestamp(),
    };
    env.events()
        .publish((symbol_short!("HOSP_STS"), hospital_id), data);
}

fn publish_record_added(env: &Env, topic: Symbol, hospital_id: u64, record_id: u64) {
    let data = RecordAddedEvent {
        hospital_id,
        record_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish((topic, hospital_id), data);
}

pub fn publish_doctor_registered(env: &Env, hospital_id: u64, doctor_id: u64) {
    publish_record_added(env, symbol_short!("DOC_ADD"), hospital_id, doctor_id);
}

pub fn publish_patient_registered(env: &Env, hospital_id: u64, patient_id: u64) {
    publish_record_added(env, symbol_short!("PAT_ADD"), hospital_id, patient_id);
}

pub fn publish_encounter_recorded(env: &Env, hospital_id: u64, encounter_id: u64) {
    publish_record_added(env, symbol_short!("ENC_ADD"), hospital_id, encounter_id);
}

pub fn publish_audit_appended(env: &Env, audit_id: u64, action: Symbol) {
    env.events()
        .publish((symbol_short!("AUD_ADD"), audit_id), action);
}

pub fn publish_audit_failed(env: &Env, action: Symbol, error_code: u32, failures: u64) {
    let data = AuditFailedEvent {
        action,
        error_code,
        failures,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish((symbol_short!("AUD_FAIL"),), data);
}
