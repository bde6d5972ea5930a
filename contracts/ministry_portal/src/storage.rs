//! Ledger layout: entity rows, uniqueness indexes and per-parent id lists.
//!
//! Rows and indexes live in persistent storage under `(PREFIX, key…)` tuples;
//! id counters and settings live in instance storage.

use crate::types::{
    AuditLog, Doctor, Hospital, HospitalAdmin, MedicalEncounter, Ministry, Patient,
    PatientHospital, PatientIdentifier, PortalConfig,
};
use soroban_sdk::{symbol_short, Address, Env, IntoVal, String, Symbol, TryFromVal, Val, Vec};

pub const TTL_THRESHOLD: u32 = 5_184_000;
pub const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Instance keys ────────────────────────────────────────────────────────────

pub const ADMIN: Symbol = symbol_short!("ADMIN");
pub const INITIALIZED: Symbol = symbol_short!("INIT");
pub const CONFIG: Symbol = symbol_short!("CONFIG");
pub const AUDIT_FAILURES: Symbol = symbol_short!("AUD_FAIL");
const COUNTER: Symbol = symbol_short!("CTR");

// ── Persistent prefixes ──────────────────────────────────────────────────────

const MINISTRY: Symbol = symbol_short!("MINISTRY");
const MINISTRY_BY_USER: Symbol = symbol_short!("MIN_USER");
const HOSPITAL: Symbol = symbol_short!("HOSPITAL");
const HOSPITAL_BY_CODE: Symbol = symbol_short!("HOSP_CODE");
const MINISTRY_HOSPITALS: Symbol = symbol_short!("MIN_HOSP");
const HOSPITAL_ADMIN: Symbol = symbol_short!("H_ADMIN");
const ADMIN_BY_USER: Symbol = symbol_short!("HADM_USR");
const ADMIN_BY_EMAIL: Symbol = symbol_short!("HADM_EML");
const HOSPITAL_ADMINS: Symbol = symbol_short!("HOSP_ADM");
const DOCTOR: Symbol = symbol_short!("DOCTOR");
const DOCTOR_BY_LICENSE: Symbol = symbol_short!("DOC_LIC");
const HOSPITAL_DOCTORS: Symbol = symbol_short!("HOSP_DOC");
const PATIENT: Symbol = symbol_short!("PATIENT");
const HOSPITAL_PATIENTS: Symbol = symbol_short!("HOSP_PAT");
const ENCOUNTER: Symbol = symbol_short!("ENCOUNTER");
const HOSPITAL_ENCOUNTERS: Symbol = symbol_short!("HOSP_ENC");
const IDENTIFIER: Symbol = symbol_short!("PAT_IDF");
const PATIENT_IDENTIFIERS: Symbol = symbol_short!("PAT_IDS");
const IDENTIFIER_INDEX: Symbol = symbol_short!("IDF_IDX");
const PATIENT_HOSPITAL: Symbol = symbol_short!("PAT_HOSP");
const PATIENT_HOSPITALS: Symbol = symbol_short!("PAT_HLST");
const AUDIT: Symbol = symbol_short!("AUDIT");
const AUDIT_BY_MINISTRY_ACTOR: Symbol = symbol_short!("AUD_MACT");
const AUDIT_BY_MINISTRY: Symbol = symbol_short!("AUD_MIN");
const AUDIT_BY_HOSPITAL: Symbol = symbol_short!("AUD_HOSP");

// Counter kinds.
pub const KIND_MINISTRY: Symbol = symbol_short!("ministry");
pub const KIND_HOSPITAL: Symbol = symbol_short!("hospital");
pub const KIND_ADMIN: Symbol = symbol_short!("h_admin");
pub const KIND_DOCTOR: Symbol = symbol_short!("doctor");
pub const KIND_PATIENT: Symbol = symbol_short!("patient");
pub const KIND_ENCOUNTER: Symbol = symbol_short!("encounter");
pub const KIND_IDENTIFIER: Symbol = symbol_short!("ident");
pub const KIND_PAT_HOSP: Symbol = symbol_short!("pat_hosp");
pub const KIND_AUDIT: Symbol = symbol_short!("audit");

// ── Generic helpers ──────────────────────────────────────────────────────────

fn put<K, V>(env: &Env, key: &K, value: &V)
where
    K: IntoVal<Env, Val>,
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn load<K, V>(env: &Env, key: &K) -> Option<V>
where
    K: IntoVal<Env, Val>,
    V: TryFromVal<Env, Val>,
{
    env.storage().persistent().get(key)
}

fn id_list<K>(env: &Env, key: &K) -> Vec<u64>
where
    K: IntoVal<Env, Val>,
{
    load(env, key).unwrap_or(Vec::new(env))
}

fn push_id<K>(env: &Env, key: &K, id: u64)
where
    K: IntoVal<Env, Val>,
{
    let mut ids = id_list(env, key);
    ids.push_back(id);
    put(env, key, &ids);
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Allocates the next id for an entity kind. Ids start at 1.
pub fn next_id(env: &Env, kind: &Symbol) -> u64 {
    let key = (COUNTER, kind.clone());
    let id: u64 = env
        .storage()
        .instance()
        .get(&key)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&key, &id);
    id
}

/// Highest id allocated so far for an entity kind.
pub fn last_id(env: &Env, kind: &Symbol) -> u64 {
    env.storage()
        .instance()
        .get(&(COUNTER, kind.clone()))
        .unwrap_or(0)
}

// ── Operator & config ────────────────────────────────────────────────────────

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&ADMIN)
}

pub fn get_config(env: &Env) -> Option<PortalConfig> {
    env.storage().instance().get(&CONFIG)
}

pub fn set_config(env: &Env, config: &PortalConfig) {
    env.storage().instance().set(&CONFIG, config);
    extend_instance(env);
}

// ── Ministries ───────────────────────────────────────────────────────────────

pub fn get_ministry(env: &Env, id: u64) -> Option<Ministry> {
    load(env, &(MINISTRY, id))
}

pub fn set_ministry(env: &Env, ministry: &Ministry) {
    put(env, &(MINISTRY, ministry.id), ministry);
}

pub fn ministry_id_by_username(env: &Env, username: &String) -> Option<u64> {
    load(env, &(MINISTRY_BY_USER, username.clone()))
}

pub fn index_ministry(env: &Env, ministry: &Ministry) {
    put(
        env,
        &(MINISTRY_BY_USER, ministry.admin_username.clone()),
        &ministry.id,
    );
}

// ── Hospitals ────────────────────────────────────────────────────────────────

pub fn get_hospital(env: &Env, id: u64) -> Option<Hospital> {
    load(env, &(HOSPITAL, id))
}

pub fn set_hospital(env: &Env, hospital: &Hospital) {
    put(env, &(HOSPITAL, hospital.id), hospital);
}

pub fn hospital_code_taken(env: &Env, code: &String) -> bool {
    env.storage()
        .persistent()
        .has(&(HOSPITAL_BY_CODE, code.clone()))
}

pub fn index_hospital(env: &Env, hospital: &Hospital) {
    put(env, &(HOSPITAL_BY_CODE, hospital.code.clone()), &hospital.id);
    push_id(env, &(MINISTRY_HOSPITALS, hospital.ministry_id), hospital.id);
}

/// Hospital ids of a ministry in creation order.
pub fn ministry_hospital_ids(env: &Env, ministry_id: u64) -> Vec<u64> {
    id_list(env, &(MINISTRY_HOSPITALS, ministry_id))
}

// ── Hospital admins ──────────────────────────────────────────────────────────

pub fn get_hospital_admin(env: &Env, id: u64) -> Option<HospitalAdmin> {
    load(env, &(HOSPITAL_ADMIN, id))
}

pub fn set_hospital_admin(env: &Env, admin: &HospitalAdmin) {
    put(env, &(HOSPITAL_ADMIN, admin.id), admin);
}

pub fn admin_id_by_username(env: &Env, username: &String) -> Option<u64> {
    load(env, &(ADMIN_BY_USER, username.clone()))
}

pub fn admin_username_taken(env: &Env, username: &String) -> bool {
    env.storage()
        .persistent()
        .has(&(ADMIN_BY_USER, username.clone()))
}

pub fn admin_email_taken(env: &Env, email: &String) -> bool {
    env.storage()
        .persistent()
        .has(&(ADMIN_BY_EMAIL, email.clone()))
}

pub fn index_hospital_admin(env: &Env, admin: &HospitalAdmin) {
    put(env, &(ADMIN_BY_USER, admin.username.clone()), &admin.id);
    put(env, &(ADMIN_BY_EMAIL, admin.email.clone()), &admin.id);
    push_id(env, &(HOSPITAL_ADMINS, admin.hospital_id), admin.id);
}

pub fn hospital_admin_ids(env: &Env, hospital_id: u64) -> Vec<u64> {
    id_list(env, &(HOSPITAL_ADMINS, hospital_id))
}

// ── Doctors ──────────────────────────────────────────────────────────────────

pub fn get_doctor(env: &Env, id: u64) -> Option<Doctor> {
    load(env, &(DOCTOR, id))
}

pub fn set_doctor(env: &Env, doctor: &Doctor) {
    put(env, &(DOCTOR, doctor.id), doctor);
}

pub fn license_taken(env: &Env, license_no: &String) -> bool {
    env.storage()
        .persistent()
        .has(&(DOCTOR_BY_LICENSE, license_no.clone()))
}

pub fn index_doctor(env: &Env, doctor: &Doctor) {
    put(
        env,
        &(DOCTOR_BY_LICENSE, doctor.license_no.clone()),
        &doctor.id,
    );
    push_id(env, &(HOSPITAL_DOCTORS, doctor.hospital_id), doctor.id);
}

pub fn hospital_doctor_ids(env: &Env, hospital_id: u64) -> Vec<u64> {
    id_list(env, &(HOSPITAL_DOCTORS, hospital_id))
}

// ── Patients ─────────────────────────────────────────────────────────────────

pub fn get_patient(env: &Env, id: u64) -> Option<Patient> {
    load(env, &(PATIENT, id))
}

pub fn set_patient(env: &Env, patient: &Patient) {
    put(env, &(PATIENT, patient.id), patient);
}

pub fn index_patient(env: &Env, patient: &Patient) {
    push_id(
        env,
        &(HOSPITAL_PATIENTS, patient.created_by_hospital),
        patient.id,
    );
}

/// Patients whose home hospital is `hospital_id`.
pub fn hospital_patient_ids(env: &Env, hospital_id: u64) -> Vec<u64> {
    id_list(env, &(HOSPITAL_PATIENTS, hospital_id))
}

// ── Encounters ───────────────────────────────────────────────────────────────

pub fn get_encounter(env: &Env, id: u64) -> Option<MedicalEncounter> {
    load(env, &(ENCOUNTER, id))
}

pub fn insert_encounter(env: &Env, encounter: &MedicalEncounter) {
    put(env, &(ENCOUNTER, encounter.id), encounter);
    push_id(
        env,
        &(HOSPITAL_ENCOUNTERS, encounter.hospital_id),
        encounter.id,
    );
}

pub fn hospital_encounter_ids(env: &Env, hospital_id: u64) -> Vec<u64> {
    id_list(env, &(HOSPITAL_ENCOUNTERS, hospital_id))
}

// ── Identifiers ──────────────────────────────────────────────────────────────

fn identifier_index_key(
    id_type: &String,
    id_value: &String,
    issued_country: &String,
) -> (Symbol, String, String, String) {
    (
        IDENTIFIER_INDEX,
        id_type.clone(),
        id_value.clone(),
        issued_country.clone(),
    )
}

pub fn identifier_taken(
    env: &Env,
    id_type: &String,
    id_value: &String,
    issued_country: &String,
) -> bool {
    env.storage()
        .persistent()
        .has(&identifier_index_key(id_type, id_value, issued_country))
}

pub fn insert_identifier(env: &Env, identifier: &PatientIdentifier) {
    put(env, &(IDENTIFIER, identifier.id), identifier);
    put(
        env,
        &identifier_index_key(
            &identifier.id_type,
            &identifier.id_value,
            &identifier.issued_country,
        ),
        &identifier.id,
    );
    push_id(
        env,
        &(PATIENT_IDENTIFIERS, identifier.patient_id),
        identifier.id,
    );
}

pub fn patient_identifiers(env: &Env, patient_id: u64) -> Vec<PatientIdentifier> {
    let mut out = Vec::new(env);
    for id in id_list(env, &(PATIENT_IDENTIFIERS, patient_id)).iter() {
        if let Some(identifier) = load::<_, PatientIdentifier>(env, &(IDENTIFIER, id)) {
            out.push_back(identifier);
        }
    }
    out
}

// ── Patient ↔ hospital links ─────────────────────────────────────────────────

pub fn get_patient_hospital(
    env: &Env,
    patient_id: u64,
    hospital_id: u64,
) -> Option<PatientHospital> {
    load(env, &(PATIENT_HOSPITAL, patient_id, hospital_id))
}

/// Stores the link, registering the hospital on the patient's list the first
/// time the pair is seen.
pub fn upsert_patient_hospital(env: &Env, link: &PatientHospital) {
    let key = (PATIENT_HOSPITAL, link.patient_id, link.hospital_id);
    let is_new = !env.storage().persistent().has(&key);
    put(env, &key, link);
    if is_new {
        push_id(env, &(PATIENT_HOSPITALS, link.patient_id), link.hospital_id);
    }
}

pub fn patient_hospitals(env: &Env, patient_id: u64) -> Vec<PatientHospital> {
    let mut out = Vec::new(env);
    for hospital_id in id_list(env, &(PATIENT_HOSPITALS, patient_id)).iter() {
        if let Some(link) = get_patient_hospital(env, patient_id, hospital_id) {
            out.push_back(link);
        }
    }
    out
}

// ── Audit ────────────────────────────────────────────────────────────────────

pub fn get_audit_log(env: &Env, id: u64) -> Option<AuditLog> {
    load(env, &(AUDIT, id))
}

pub fn insert_audit_log(env: &Env, record: &AuditLog) {
    put(env, &(AUDIT, record.id), record);
}

/// Ids of records performed by any ministry, ascending.
pub fn ministry_actor_audit_ids(env: &Env) -> Vec<u64> {
    id_list(env, &AUDIT_BY_MINISTRY_ACTOR)
}

pub fn index_ministry_actor_audit(env: &Env, id: u64) {
    push_id(env, &AUDIT_BY_MINISTRY_ACTOR, id);
}

/// Ids of non-ministry records linked to one of the ministry's hospitals,
/// ascending. Disjoint from [`ministry_actor_audit_ids`].
pub fn ministry_audit_ids(env: &Env, ministry_id: u64) -> Vec<u64> {
    id_list(env, &(AUDIT_BY_MINISTRY, ministry_id))
}

pub fn index_ministry_audit(env: &Env, ministry_id: u64, id: u64) {
    push_id(env, &(AUDIT_BY_MINISTRY, ministry_id), id);
}

/// Ids of every record linked to the hospital, ascending.
pub fn hospital_audit_ids(env: &Env, hospital_id: u64) -> Vec<u64> {
    id_list(env, &(AUDIT_BY_HOSPITAL, hospital_id))
}

pub fn index_hospital_audit(env: &Env, hospital_id: u64, id: u64) {
    push_id(env, &(AUDIT_BY_HOSPITAL, hospital_id), id);
}

pub fn audit_failure_count(env: &Env) -> u64 {
    env.storage().instance().get(&AUDIT_FAILURES).unwrap_or(0)
}

pub fn bump_audit_failures(env: &Env) -> u64 {
    let count = audit_failure_count(env).saturating_add(1);
    env.storage().instance().set(&AUDIT_FAILURES, &count);
    count
}
