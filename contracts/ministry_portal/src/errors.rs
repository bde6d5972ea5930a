use portal_common::CommonError;
use soroban_sdk::{contracttype, Env, String};

/// Error categories for classifying failures.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Contract setup: not initialised, initialised twice.
    Lifecycle = 1,
    /// Login failed or no live session. Never says which.
    Authentication = 2,
    /// Caller is not the platform operator.
    Authorization = 3,
    /// Missing resource, including resources owned by another tenant.
    NotFound = 4,
    /// Bad or missing input.
    Validation = 5,
    /// Uniqueness or consistency conflict with stored data.
    Conflict = 6,
}

/// Display details of an error code, for the gateway's flash messages.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorContext {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub retryable: bool,
}

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PortalError {
    // ── Lifecycle (1–9) ──────────────────────────────────────
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,

    // ── Authentication (10–19) ───────────────────────────────
    InvalidCredentials = 10,
    NotAuthenticated = 11,

    // ── Not found (20–29) ────────────────────────────────────
    MinistryNotFound = 20,
    HospitalNotFound = 21,
    DoctorNotFound = 22,
    PatientNotFound = 23,

    // ── Validation (30–39) ───────────────────────────────────
    InvalidInput = 30,
    InvalidDate = 31,
    NameTooLong = 32,
    InvalidConfig = 33,

    // ── Conflicts (40–49) ────────────────────────────────────
    UsernameTaken = 40,
    EmailTaken = 41,
    LicenseTaken = 42,
    IdentifierTaken = 43,
    CodeSpaceExhausted = 44,
    DoctorHospitalMismatch = 45,
    HospitalInactive = 46,
}

impl PortalError {
    pub fn from_code(code: u32) -> Option<Self> {
        let error = match code {
            1 => PortalError::NotInitialized,
            2 => PortalError::AlreadyInitialized,
            3 => PortalError::Unauthorized,
            10 => PortalError::InvalidCredentials,
            11 => PortalError::NotAuthenticated,
            20 => PortalError::MinistryNotFound,
            21 => PortalError::HospitalNotFound,
            22 => PortalError::DoctorNotFound,
            23 => PortalError::PatientNotFound,
            30 => PortalError::InvalidInput,
            31 => PortalError::InvalidDate,
            32 => PortalError::NameTooLong,
            33 => PortalError::InvalidConfig,
            40 => PortalError::UsernameTaken,
            41 => PortalError::EmailTaken,
            42 => PortalError::LicenseTaken,
            43 => PortalError::IdentifierTaken,
            44 => PortalError::CodeSpaceExhausted,
            45 => PortalError::DoctorHospitalMismatch,
            46 => PortalError::HospitalInactive,
            _ => return None,
        };
        Some(error)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PortalError::NotInitialized | PortalError::AlreadyInitialized => {
                ErrorCategory::Lifecycle
            }
            PortalError::Unauthorized => ErrorCategory::Authorization,
            PortalError::InvalidCredentials | PortalError::NotAuthenticated => {
                ErrorCategory::Authentication
            }
            PortalError::MinistryNotFound
            | PortalError::HospitalNotFound
            | PortalError::DoctorNotFound
            | PortalError::PatientNotFound => ErrorCategory::NotFound,
            PortalError::InvalidInput
            | PortalError::InvalidDate
            | PortalError::NameTooLong
            | PortalError::InvalidConfig => ErrorCategory::Validation,
            PortalError::UsernameTaken
            | PortalError::EmailTaken
            | PortalError::LicenseTaken
            | PortalError::IdentifierTaken
            | PortalError::CodeSpaceExhausted
            | PortalError::DoctorHospitalMismatch
            | PortalError::HospitalInactive => ErrorCategory::Conflict,
        }
    }

    /// Only a code collision streak can succeed on an unchanged resubmit.
    pub fn retryable(&self) -> bool {
        matches!(self, PortalError::CodeSpaceExhausted)
    }

    pub fn message(&self) -> &'static str {
        match self {
            PortalError::NotInitialized => "Contract has not been initialized",
            PortalError::AlreadyInitialized => "Contract is already initialized",
            PortalError::Unauthorized => "Caller is not the platform operator",
            PortalError::InvalidCredentials => "Invalid credentials or account is inactive",
            PortalError::NotAuthenticated => "Please log in",
            PortalError::MinistryNotFound => "Ministry not found",
            PortalError::HospitalNotFound => "Hospital not found or access denied",
            PortalError::DoctorNotFound => "Doctor not found",
            PortalError::PatientNotFound => "Patient not found",
            PortalError::InvalidInput => "A required field is missing or malformed",
            PortalError::InvalidDate => "Date does not exist",
            PortalError::NameTooLong => "Name is too long",
            PortalError::InvalidConfig => "Configuration value out of range",
            PortalError::UsernameTaken => "Username is already in use",
            PortalError::EmailTaken => "Email address is already in use",
            PortalError::LicenseTaken => "License number is already registered",
            PortalError::IdentifierTaken => "Identifier is already registered",
            PortalError::CodeSpaceExhausted => "Could not allocate a unique hospital code",
            PortalError::DoctorHospitalMismatch => "Doctor does not belong to this hospital",
            PortalError::HospitalInactive => "Hospital is inactive",
        }
    }
}

/// Builds the display context of an error.
pub fn error_context(env: &Env, error: PortalError) -> ErrorContext {
    ErrorContext {
        code: error as u32,
        category: error.category(),
        message: String::from_str(env, error.message()),
        retryable: error.retryable(),
    }
}

impl From<CommonError> for PortalError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => PortalError::NotInitialized,
            CommonError::AlreadyInitialized => PortalError::AlreadyInitialized,
            CommonError::Unauthorized => PortalError::Unauthorized,
            CommonError::InvalidCredentials => PortalError::InvalidCredentials,
            CommonError::NotAuthenticated => PortalError::NotAuthenticated,
            CommonError::InvalidInput => PortalError::InvalidInput,
            CommonError::InvalidDate => PortalError::InvalidDate,
        }
    }
}
