use portal_common::{CivilDate, PasswordHash, UserType};
use soroban_sdk::{contracttype, Map, String, Symbol, Vec};

// ── Shared value types ───────────────────────────────────────────────────────

/// Free-form contact details. Every field is optional.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HospitalAddress {
    pub address_line1: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

/// Network metadata the calling gateway attaches to audited requests.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestOrigin {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Who performed an audited action.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ActorType {
    Ministry = 1,
    HospitalAdmin = 2,
    Doctor = 3,
    Patient = 4,
    System = 5,
}

/// Runtime settings owned by the platform operator.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PortalConfig {
    pub session_ttl_seconds: u64,
    /// Length of generated hospital-admin passwords.
    pub admin_password_length: u32,
    /// Deactivating a hospital also deactivates its admins, doctors and the
    /// patients it created.
    pub cascade_deactivation: bool,
    /// Maximum number of audit records the ledger sink accepts; 0 = no limit.
    pub audit_capacity: u64,
}

// ── Entities ─────────────────────────────────────────────────────────────────

/// Top-level tenant authority.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ministry {
    pub id: u64,
    pub name: String,
    pub admin_username: String,
    pub password: PasswordHash,
    pub contact_info: ContactInfo,
    pub is_active: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hospital {
    pub id: u64,
    pub name: String,
    pub ministry_id: u64,
    pub code: String,
    pub address: HospitalAddress,
    pub contact_info: ContactInfo,
    pub is_active: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HospitalAdmin {
    pub id: u64,
    pub hospital_id: u64,
    pub username: String,
    pub password: PasswordHash,
    pub full_name: String,
    pub email: String,
    pub contact_info: ContactInfo,
    pub is_active: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Doctor {
    pub id: u64,
    pub hospital_id: u64,
    pub license_no: String,
    pub password: PasswordHash,
    pub full_name: String,
    pub nic: Option<String>,
    pub email: Option<String>,
    pub specialties: Vec<String>,
    pub contact_info: ContactInfo,
    pub is_active: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Patient {
    pub id: u64,
    pub full_name: String,
    pub date_of_birth: Option<CivilDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub contact_info: ContactInfo,
    pub email: Option<String>,
    pub blood_type: Option<String>,
    pub guardian_number: Option<String>,
    /// Home hospital. Fixed at creation.
    pub created_by_hospital: u64,
    pub is_active: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientIdentifier {
    pub id: u64,
    pub patient_id: u64,
    pub id_type: String,
    pub id_value: String,
    pub issued_country: String,
    pub created_at: u64,
}

/// A single clinical visit. Immutable once recorded.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MedicalEncounter {
    pub id: u64,
    pub receipt_number: Option<String>,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub hospital_id: u64,
    pub diagnosis_text: String,
    pub diagnosis_code: Option<String>,
    pub medicines: Vec<String>,
    pub suggestions: Option<String>,
    pub treatment_date: CivilDate,
    pub created_at: u64,
}

/// Patient-scoped access token handed out by the QR service.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QrToken {
    pub id: u64,
    pub token: String,
    pub patient_id: u64,
    pub hospital_id: u64,
    pub purpose: Option<String>,
    pub expires_at: Option<u64>,
    pub revoked: bool,
    pub created_at: u64,
}

impl QrToken {
    /// Revoked and expired tokens are never valid.
    pub fn is_valid_at(&self, now: u64) -> bool {
        if self.revoked {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => now < expires_at,
            None => true,
        }
    }
}

/// Append-only record of a significant action.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditLog {
    pub id: u64,
    pub acting_user_type: ActorType,
    pub acting_user_id: Option<u64>,
    pub patient_id: Option<u64>,
    pub hospital_id: Option<u64>,
    pub action: Symbol,
    pub details: Map<Symbol, String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: u64,
}

/// A hospital at which a patient has been seen.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientHospital {
    pub id: u64,
    pub patient_id: u64,
    pub hospital_id: u64,
    pub first_seen: u64,
    pub last_seen: u64,
    pub notes: Option<String>,
}

// ── Inputs ───────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MinistryRegistration {
    pub name: String,
    pub admin_username: String,
    pub password: String,
    pub contact_info: ContactInfo,
}

/// The add-hospital form.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HospitalRegistration {
    pub hospital_name: String,
    pub address: HospitalAddress,
    pub phone_primary: String,
    pub email: String,
    pub admin_full_name: String,
    pub admin_email: String,
    pub admin_phone: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorRegistration {
    pub license_no: String,
    pub password: String,
    pub full_name: String,
    pub nic: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialties: Vec<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientRegistration {
    pub full_name: String,
    pub date_of_birth: Option<CivilDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub blood_type: Option<String>,
    pub guardian_number: Option<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncounterInput {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub receipt_number: Option<String>,
    pub diagnosis_text: String,
    pub diagnosis_code: Option<String>,
    pub medicines: Vec<String>,
    pub suggestions: Option<String>,
    pub treatment_date: CivilDate,
}

// ── Views ────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Landing {
    Login,
    Dashboard,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MinistrySessionView {
    pub user_type: UserType,
    pub ministry_id: u64,
    pub ministry_name: String,
    pub expires_at: u64,
}

/// Result of hospital onboarding. The plaintext password exists only here.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProvisionedHospital {
    pub hospital: Hospital,
    pub hospital_code: String,
    pub admin_username: String,
    pub admin_password: String,
}

/// Hospital admin without credential material.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminSummary {
    pub id: u64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub contact_info: ContactInfo,
}

impl From<HospitalAdmin> for AdminSummary {
    fn from(admin: HospitalAdmin) -> Self {
        AdminSummary {
            id: admin.id,
            username: admin.username,
            full_name: admin.full_name,
            email: admin.email,
            contact_info: admin.contact_info,
        }
    }
}

/// Doctor without credential material.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorProfile {
    pub id: u64,
    pub hospital_id: u64,
    pub license_no: String,
    pub full_name: String,
    pub nic: Option<String>,
    pub email: Option<String>,
    pub specialties: Vec<String>,
    pub contact_info: ContactInfo,
    pub is_active: bool,
    pub created_at: u64,
}

impl From<Doctor> for DoctorProfile {
    fn from(doctor: Doctor) -> Self {
        DoctorProfile {
            id: doctor.id,
            hospital_id: doctor.hospital_id,
            license_no: doctor.license_no,
            full_name: doctor.full_name,
            nic: doctor.nic,
            email: doctor.email,
            specialties: doctor.specialties,
            contact_info: doctor.contact_info,
            is_active: doctor.is_active,
            created_at: doctor.created_at,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DashboardView {
    pub total_hospitals: u32,
    pub total_doctors: u32,
    pub total_patients: u32,
    pub total_encounters: u32,
    pub recent_hospitals: Vec<Hospital>,
    pub recent_activity: Vec<AuditLog>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HospitalSummary {
    pub hospital: Hospital,
    pub doctor_count: u32,
    pub patient_count: u32,
    pub encounter_count: u32,
    pub admin: Option<AdminSummary>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientWithAge {
    pub patient: Patient,
    pub age: Option<u32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HospitalDetailView {
    pub hospital: Hospital,
    pub admin: Option<AdminSummary>,
    pub doctors: Vec<DoctorProfile>,
    pub patients: Vec<PatientWithAge>,
    pub encounters_this_month: u32,
    pub audit_logs: Vec<AuditLog>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientListing {
    pub patient: Patient,
    pub hospital_id: u64,
    pub hospital_name: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorListing {
    pub doctor: DoctorProfile,
    pub hospital_id: u64,
    pub hospital_name: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthlyCount {
    pub label: String,
    pub count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HospitalStats {
    pub hospital_id: u64,
    pub name: String,
    pub encounter_count: u32,
    pub patient_count: u32,
    pub doctor_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnalyticsView {
    pub monthly_encounters: Vec<MonthlyCount>,
    pub hospital_stats: Vec<HospitalStats>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditLogPage {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub items: Vec<AuditLog>,
}
