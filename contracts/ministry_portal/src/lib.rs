#![no_std]
#![allow(clippy::too_many_arguments)]

pub mod audit;
pub mod config;
pub mod errors;
pub mod events;
pub mod guard;
pub mod ingest;
pub mod provisioning;
pub mod reporting;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_reporting;

pub use errors::{ErrorCategory, ErrorContext, PortalError};

use audit::AuditEntry;
use portal_common::{
    end_session, get_session, hash_password, start_session, validate_password, verify_password,
    AuthSession, UserType,
};
use soroban_sdk::{contract, contractimpl, log, Address, Env, String, Vec};
use types::{
    ActorType, AnalyticsView, AuditLogPage, DashboardView, Doctor, DoctorListing,
    DoctorRegistration, EncounterInput, HospitalDetailView, HospitalRegistration,
    HospitalSummary, Landing, MedicalEncounter, Ministry, MinistryRegistration,
    MinistrySessionView, Patient, PatientHospital, PatientIdentifier, PatientListing,
    PatientRegistration, PortalConfig, ProvisionedHospital, RequestOrigin,
};

pub const MAX_MINISTRY_NAME_LEN: u32 = 255;

#[contract]
pub struct MinistryPortalContract;

#[contractimpl]
impl MinistryPortalContract {
    // ── Initialization ───────────────────────────────────────────────────────

    /// Records the platform operator. No ministry or credential is seeded;
    /// the operator follows up with `setup_ministry`.
    pub fn initialize(env: Env, admin: Address) -> Result<(), PortalError> {
        if env.storage().instance().has(&storage::INITIALIZED) {
            return Err(PortalError::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&storage::ADMIN, &admin);
        env.storage().instance().set(&storage::INITIALIZED, &true);
        storage::extend_instance(&env);

        events::publish_initialized(&env, admin);

        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, PortalError> {
        storage::get_admin(&env).ok_or(PortalError::NotInitialized)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&storage::INITIALIZED)
    }

    pub fn set_config(env: Env, caller: Address, config: PortalConfig) -> Result<(), PortalError> {
        guard::require_admin(&env, &caller)?;
        config::validate(&config)?;
        storage::set_config(&env, &config);
        events::publish_config_updated(&env, caller);
        Ok(())
    }

    pub fn get_config(env: Env) -> PortalConfig {
        config::load(&env)
    }

    /// Category and display text for an error code returned by this
    /// contract. Unknown codes yield `None`.
    pub fn describe_error(env: Env, code: u32) -> Option<ErrorContext> {
        PortalError::from_code(code).map(|error| errors::error_context(&env, error))
    }

    // ── Ministry tenants ─────────────────────────────────────────────────────

    /// Creates a ministry account with operator-supplied credentials.
    pub fn setup_ministry(
        env: Env,
        caller: Address,
        registration: MinistryRegistration,
    ) -> Result<Ministry, PortalError> {
        guard::require_admin(&env, &caller)?;

        if provisioning::is_blank(&registration.name)
            || provisioning::is_blank(&registration.admin_username)
        {
            return Err(PortalError::InvalidInput);
        }
        if registration.name.len() > MAX_MINISTRY_NAME_LEN
            || registration.admin_username.len() > provisioning::MAX_USERNAME_LEN
        {
            return Err(PortalError::NameTooLong);
        }
        validate_password(&registration.password)?;
        if storage::ministry_id_by_username(&env, &registration.admin_username).is_some() {
            return Err(PortalError::UsernameTaken);
        }

        let now = env.ledger().timestamp();
        let ministry = Ministry {
            id: storage::next_id(&env, &storage::KIND_MINISTRY),
            name: registration.name,
            admin_username: registration.admin_username,
            password: hash_password(&env, &registration.password),
            contact_info: registration.contact_info,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        storage::set_ministry(&env, &ministry);
        storage::index_ministry(&env, &ministry);

        events::publish_ministry_created(&env, ministry.id, ministry.name.clone());

        Ok(ministry)
    }

    /// Suspends or restores a ministry. A suspended ministry cannot log in
    /// and its open sessions stop passing the guard.
    pub fn set_ministry_status(
        env: Env,
        caller: Address,
        ministry_id: u64,
        is_active: bool,
    ) -> Result<(), PortalError> {
        guard::require_admin(&env, &caller)?;

        let mut ministry =
            storage::get_ministry(&env, ministry_id).ok_or(PortalError::MinistryNotFound)?;
        ministry.is_active = is_active;
        ministry.updated_at = env.ledger().timestamp();
        storage::set_ministry(&env, &ministry);

        events::publish_ministry_status(&env, ministry_id, is_active);
        Ok(())
    }

    pub fn get_ministry(env: Env, ministry_id: u64) -> Result<Ministry, PortalError> {
        storage::get_ministry(&env, ministry_id).ok_or(PortalError::MinistryNotFound)
    }

    // ── Sessions ─────────────────────────────────────────────────────────────

    /// Authenticates a ministry administrator and opens a session for
    /// `caller`. Unknown usernames, inactive ministries and wrong passwords
    /// all fail with the same error.
    pub fn login(
        env: Env,
        caller: Address,
        username: String,
        password: String,
        origin: RequestOrigin,
    ) -> Result<MinistrySessionView, PortalError> {
        guard::require_initialized(&env)?;
        caller.require_auth();

        let ministry = storage::ministry_id_by_username(&env, &username)
            .and_then(|id| storage::get_ministry(&env, id))
            .filter(|ministry| ministry.is_active)
            .ok_or(PortalError::InvalidCredentials)?;
        if !verify_password(&env, &password, &ministry.password) {
            log!(&env, "ministry login rejected", ministry.id);
            return Err(PortalError::InvalidCredentials);
        }

        let session = start_session(
            &env,
            &caller,
            UserType::Ministry,
            ministry.id,
            ministry.id,
            ministry.name.clone(),
            config::load(&env).session_ttl_seconds,
        );

        events::publish_login(&env, caller, UserType::Ministry, ministry.id);
        audit::record(
            &env,
            AuditEntry::new(
                &env,
                ActorType::Ministry,
                Some(ministry.id),
                audit::MINISTRY_LOGIN,
            )
            .origin(&origin),
        );

        Ok(MinistrySessionView {
            user_type: session.user_type,
            ministry_id: ministry.id,
            ministry_name: ministry.name,
            expires_at: session.expires_at,
        })
    }

    /// Clears the caller's session. Succeeds whether or not one exists.
    pub fn logout(env: Env, caller: Address, origin: RequestOrigin) {
        caller.require_auth();

        if let Some(session) = get_session(&env, &caller) {
            if session.user_type == UserType::Ministry {
                audit::record(
                    &env,
                    AuditEntry::new(
                        &env,
                        ActorType::Ministry,
                        Some(session.tenant_id),
                        audit::MINISTRY_LOGOUT,
                    )
                    .origin(&origin),
                );
            }
        }
        if end_session(&env, &caller).is_some() {
            events::publish_logout(&env, caller);
        }
    }

    /// Where the portal root sends the caller.
    pub fn landing(env: Env, caller: Address) -> Landing {
        let has_ministry_session = get_session(&env, &caller)
            .filter(|session| session.user_type == UserType::Ministry)
            .and_then(|session| storage::get_ministry(&env, session.tenant_id))
            .map(|ministry| ministry.is_active)
            .unwrap_or(false);
        if has_ministry_session {
            Landing::Dashboard
        } else {
            Landing::Login
        }
    }

    pub fn current_session(env: Env, caller: Address) -> Option<AuthSession> {
        get_session(&env, &caller)
    }

    // ── Hospital management ──────────────────────────────────────────────────

    /// Onboards a hospital and its first administrator. The generated
    /// password is returned once and never stored in plaintext.
    pub fn add_hospital(
        env: Env,
        caller: Address,
        registration: HospitalRegistration,
        origin: RequestOrigin,
    ) -> Result<ProvisionedHospital, PortalError> {
        let principal = guard::require_ministry(&env, &caller)?;
        provisioning::add_hospital(&env, &principal, registration, &origin)
    }

    /// Flips a hospital between active and inactive; returns the new state.
    pub fn toggle_hospital_status(
        env: Env,
        caller: Address,
        hospital_id: u64,
        origin: RequestOrigin,
    ) -> Result<bool, PortalError> {
        let principal = guard::require_ministry(&env, &caller)?;
        provisioning::toggle_hospital_status(&env, &principal, hospital_id, &origin)
    }

    // ── Ministry views ───────────────────────────────────────────────────────

    pub fn dashboard(env: Env, caller: Address) -> Result<DashboardView, PortalError> {
        let principal = guard::require_ministry(&env, &caller)?;
        Ok(reporting::dashboard(&env, &principal))
    }

    pub fn list_hospitals(env: Env, caller: Address) -> Result<Vec<HospitalSummary>, PortalError> {
        let principal = guard::require_ministry(&env, &caller)?;
        Ok(reporting::list_hospitals(&env, &principal))
    }

    pub fn hospital_details(
        env: Env,
        caller: Address,
        hospital_id: u64,
    ) -> Result<HospitalDetailView, PortalError> {
        let principal = guard::require_ministry(&env, &caller)?;
        reporting::hospital_details(&env, &principal, hospital_id)
    }

    pub fn list_patients(env: Env, caller: Address) -> Result<Vec<PatientListing>, PortalError> {
        let principal = guard::require_ministry(&env, &caller)?;
        Ok(reporting::list_patients(&env, &principal))
    }

    pub fn list_doctors(env: Env, caller: Address) -> Result<Vec<DoctorListing>, PortalError> {
        let principal = guard::require_ministry(&env, &caller)?;
        Ok(reporting::list_doctors(&env, &principal))
    }

    pub fn analytics(env: Env, caller: Address) -> Result<AnalyticsView, PortalError> {
        let principal = guard::require_ministry(&env, &caller)?;
        Ok(reporting::analytics(&env, &principal))
    }

    /// One page (50 records, newest first) of the ministry's audit trail.
    pub fn audit_logs(env: Env, caller: Address, page: u32) -> Result<AuditLogPage, PortalError> {
        let principal = guard::require_ministry(&env, &caller)?;
        Ok(reporting::audit_logs(&env, &principal, page))
    }

    /// Number of audit appends that were dropped.
    pub fn audit_failure_count(env: Env) -> u64 {
        storage::audit_failure_count(&env)
    }

    // ── Hospital portal interface ────────────────────────────────────────────

    pub fn hospital_login(
        env: Env,
        caller: Address,
        username: String,
        password: String,
        origin: RequestOrigin,
    ) -> Result<AuthSession, PortalError> {
        guard::require_initialized(&env)?;
        caller.require_auth();
        ingest::hospital_login(&env, &caller, username, password, &origin)
    }

    pub fn register_doctor(
        env: Env,
        caller: Address,
        registration: DoctorRegistration,
    ) -> Result<Doctor, PortalError> {
        let principal = guard::require_hospital_admin(&env, &caller)?;
        ingest::register_doctor(&env, &principal, registration)
    }

    pub fn register_patient(
        env: Env,
        caller: Address,
        registration: PatientRegistration,
    ) -> Result<Patient, PortalError> {
        let principal = guard::require_hospital_admin(&env, &caller)?;
        ingest::register_patient(&env, &principal, registration)
    }

    /// `issued_country` defaults to Sri Lanka when omitted.
    pub fn add_patient_identifier(
        env: Env,
        caller: Address,
        patient_id: u64,
        id_type: String,
        id_value: String,
        issued_country: Option<String>,
    ) -> Result<PatientIdentifier, PortalError> {
        guard::require_hospital_admin(&env, &caller)?;
        ingest::add_patient_identifier(&env, patient_id, id_type, id_value, issued_country)
    }

    pub fn record_encounter(
        env: Env,
        caller: Address,
        input: EncounterInput,
    ) -> Result<MedicalEncounter, PortalError> {
        let principal = guard::require_hospital_admin(&env, &caller)?;
        ingest::record_encounter(&env, &principal, input)
    }

    pub fn get_patient_identifiers(env: Env, patient_id: u64) -> Vec<PatientIdentifier> {
        storage::patient_identifiers(&env, patient_id)
    }

    pub fn get_patient_hospitals(env: Env, patient_id: u64) -> Vec<PatientHospital> {
        storage::patient_hospitals(&env, patient_id)
    }
}
