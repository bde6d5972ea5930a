//! Write interface used by the hospital portal.
//!
//! Hospital admins log in here and register the doctors, patients,
//! identifiers and encounters that the ministry views aggregate.

use crate::audit::{self, AuditEntry};
use crate::config;
use crate::errors::PortalError;
use crate::events;
use crate::guard::HospitalPrincipal;
use crate::provisioning::is_blank;
use crate::storage::{
    self, KIND_DOCTOR, KIND_ENCOUNTER, KIND_IDENTIFIER, KIND_PATIENT, KIND_PAT_HOSP,
};
use crate::types::{
    ActorType, ContactInfo, Doctor, DoctorRegistration, EncounterInput, MedicalEncounter, Patient,
    PatientHospital, PatientIdentifier, PatientRegistration, RequestOrigin,
};
use portal_common::{
    hash_password, start_session, validate_password, verify_password, AuthSession, UserType,
};
use soroban_sdk::{Address, Env, String, Symbol};

pub const DEFAULT_ISSUED_COUNTRY: &str = "Sri Lanka";

pub fn hospital_login(
    env: &Env,
    caller: &Address,
    username: String,
    password: String,
    origin: &RequestOrigin,
) -> Result<AuthSession, PortalError> {
    let admin = storage::admin_id_by_username(env, &username)
        .and_then(|id| storage::get_hospital_admin(env, id))
        .filter(|admin| admin.is_active)
        .ok_or(PortalError::InvalidCredentials)?;
    let hospital = storage::get_hospital(env, admin.hospital_id)
        .filter(|hospital| hospital.is_active)
        .ok_or(PortalError::InvalidCredentials)?;
    if !verify_password(env, &password, &admin.password) {
        return Err(PortalError::InvalidCredentials);
    }

    let session = start_session(
        env,
        caller,
        UserType::HospitalAdmin,
        admin.id,
        hospital.id,
        admin.full_name.clone(),
        config::load(env).session_ttl_seconds,
    );
    events::publish_login(env, caller.clone(), UserType::HospitalAdmin, admin.id);
    audit::record(
        env,
        AuditEntry::new(
            env,
            ActorType::HospitalAdmin,
            Some(admin.id),
            audit::HOSPITAL_ADMIN_LOGIN,
        )
        .hospital(hospital.id)
        .origin(origin),
    );
    Ok(session)
}

pub fn register_doctor(
    env: &Env,
    principal: &HospitalPrincipal,
    registration: DoctorRegistration,
) -> Result<Doctor, PortalError> {
    if is_blank(&registration.license_no) || is_blank(&registration.full_name) {
        return Err(PortalError::InvalidInput);
    }
    validate_password(&registration.password)?;
    if storage::license_taken(env, &registration.license_no) {
        return Err(PortalError::LicenseTaken);
    }

    let now = env.ledger().timestamp();
    let doctor = Doctor {
        id: storage::next_id(env, &KIND_DOCTOR),
        hospital_id: principal.hospital_id,
        license_no: registration.license_no,
        password: hash_password(env, &registration.password),
        full_name: registration.full_name,
        nic: registration.nic,
        email: registration.email.clone(),
        specialties: registration.specialties,
        contact_info: ContactInfo {
            phone: registration.phone,
            email: registration.email,
            address: None,
        },
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    storage::set_doctor(env, &doctor);
    storage::index_doctor(env, &doctor);

    events::publish_doctor_registered(env, principal.hospital_id, doctor.id);
    audit::record(
        env,
        AuditEntry::new(
            env,
            ActorType::HospitalAdmin,
            Some(principal.admin_id),
            audit::DOCTOR_REGISTERED,
        )
        .hospital(principal.hospital_id)
        .detail(Symbol::new(env, "license_no"), doctor.license_no.clone()),
    );
    Ok(doctor)
}

pub fn register_patient(
    env: &Env,
    principal: &HospitalPrincipal,
    registration: PatientRegistration,
) -> Result<Patient, PortalError> {
    if is_blank(&registration.full_name) {
        return Err(PortalError::InvalidInput);
    }
    if let Some(dob) = &registration.date_of_birth {
        if !dob.is_valid() {
            return Err(PortalError::InvalidDate);
        }
    }

    let now = env.ledger().timestamp();
    let patient = Patient {
        id: storage::next_id(env, &KIND_PATIENT),
        full_name: registration.full_name,
        date_of_birth: registration.date_of_birth,
        gender: registration.gender,
        address: registration.address.clone(),
        contact_info: ContactInfo {
            phone: registration.phone,
            email: registration.email.clone(),
            address: registration.address,
        },
        email: registration.email,
        blood_type: registration.blood_type,
        guardian_number: registration.guardian_number,
        created_by_hospital: principal.hospital_id,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    storage::set_patient(env, &patient);
    storage::index_patient(env, &patient);
    touch_patient_hospital(env, patient.id, principal.hospital_id, now);

    events::publish_patient_registered(env, principal.hospital_id, patient.id);
    audit::record(
        env,
        AuditEntry::new(
            env,
            ActorType::HospitalAdmin,
            Some(principal.admin_id),
            audit::PATIENT_REGISTERED,
        )
        .hospital(principal.hospital_id)
        .patient(patient.id),
    );
    Ok(patient)
}

/// Attaches an external identifier (NIC, passport, …) to a patient.
/// `(id_type, id_value, issued_country)` is unique across all patients.
pub fn add_patient_identifier(
    env: &Env,
    patient_id: u64,
    id_type: String,
    id_value: String,
    issued_country: Option<String>,
) -> Result<PatientIdentifier, PortalError> {
    if is_blank(&id_type) || is_blank(&id_value) {
        return Err(PortalError::InvalidInput);
    }
    if storage::get_patient(env, patient_id).is_none() {
        return Err(PortalError::PatientNotFound);
    }
    let issued_country =
        issued_country.unwrap_or_else(|| String::from_str(env, DEFAULT_ISSUED_COUNTRY));
    if storage::identifier_taken(env, &id_type, &id_value, &issued_country) {
        return Err(PortalError::IdentifierTaken);
    }

    let identifier = PatientIdentifier {
        id: storage::next_id(env, &KIND_IDENTIFIER),
        patient_id,
        id_type,
        id_value,
        issued_country,
        created_at: env.ledger().timestamp(),
    };
    storage::insert_identifier(env, &identifier);
    Ok(identifier)
}

pub fn record_encounter(
    env: &Env,
    principal: &HospitalPrincipal,
    input: EncounterInput,
) -> Result<MedicalEncounter, PortalError> {
    if is_blank(&input.diagnosis_text) {
        return Err(PortalError::InvalidInput);
    }
    if !input.treatment_date.is_valid() {
        return Err(PortalError::InvalidDate);
    }
    let doctor = storage::get_doctor(env, input.doctor_id)
        .filter(|doctor| doctor.is_active)
        .ok_or(PortalError::DoctorNotFound)?;
    if doctor.hospital_id != principal.hospital_id {
        return Err(PortalError::DoctorHospitalMismatch);
    }
    if storage::get_patient(env, input.patient_id).is_none() {
        return Err(PortalError::PatientNotFound);
    }

    let now = env.ledger().timestamp();
    let encounter = MedicalEncounter {
        id: storage::next_id(env, &KIND_ENCOUNTER),
        receipt_number: input.receipt_number,
        patient_id: input.patient_id,
        doctor_id: doctor.id,
        hospital_id: principal.hospital_id,
        diagnosis_text: input.diagnosis_text,
        diagnosis_code: input.diagnosis_code,
        medicines: input.medicines,
        suggestions: input.suggestions,
        treatment_date: input.treatment_date,
        created_at: now,
    };
    storage::insert_encounter(env, &encounter);
    touch_patient_hospital(env, encounter.patient_id, principal.hospital_id, now);

    events::publish_encounter_recorded(env, principal.hospital_id, encounter.id);
    audit::record(
        env,
        AuditEntry::new(
            env,
            ActorType::HospitalAdmin,
            Some(principal.admin_id),
            audit::ENCOUNTER_RECORDED,
        )
        .hospital(principal.hospital_id)
        .patient(encounter.patient_id),
    );
    Ok(encounter)
}

/// Records that a patient was seen at a hospital. `first_seen` is kept from
/// the first visit.
fn touch_patient_hospital(env: &Env, patient_id: u64, hospital_id: u64, now: u64) {
    let link = match storage::get_patient_hospital(env, patient_id, hospital_id) {
        Some(mut link) => {
            link.last_seen = now;
            link
        }
        None => PatientHospital {
            id: storage::next_id(env, &KIND_PAT_HOSP),
            patient_id,
            hospital_id,
            first_seen: now,
            last_seen: now,
            notes: None,
        },
    };
    storage::upsert_patient_hospital(env, &link);
}
