//! Hospital onboarding and activation.

use crate::audit::{self, AuditEntry};
use crate::config;
use crate::errors::PortalError;
use crate::events;
use crate::guard::{self, MinistryPrincipal};
use crate::storage::{self, KIND_ADMIN, KIND_HOSPITAL};
use crate::types::{
    ActorType, ContactInfo, Hospital, HospitalAdmin, HospitalRegistration, ProvisionedHospital,
    RequestOrigin,
};
use portal_common::{fill_random_digits, generate_password, hash_password};
use soroban_sdk::{log, Env, String, Symbol};

pub const MAX_USERNAME_LEN: u32 = 100;
pub const CODE_PREFIX_LEN: usize = 6;
/// Six characters of at most four UTF-8 bytes each.
pub const CODE_PREFIX_MAX_BYTES: usize = CODE_PREFIX_LEN * 4;
pub const CODE_DIGITS: usize = 4;
pub const MAX_CODE_ATTEMPTS: u32 = 16;
pub const MAX_USERNAME_SUFFIX: u32 = 99;

const ADMIN_SUFFIX: &[u8] = b"_admin";
const USERNAME_SUFFIX_LEN: usize = 3;
/// Longest name whose derived username, `_99` included, fits the username
/// limit.
pub const MAX_HOSPITAL_NAME_LEN: u32 =
    MAX_USERNAME_LEN - ADMIN_SUFFIX.len() as u32 - USERNAME_SUFFIX_LEN as u32;
const USERNAME_BUF_LEN: usize = MAX_USERNAME_LEN as usize;
const CODE_BUF_LEN: usize = CODE_PREFIX_MAX_BYTES + CODE_DIGITS;
const BLANK_SCAN_CHUNK: u32 = 64;

/// Empty or ASCII-whitespace only.
pub(crate) fn is_blank(value: &String) -> bool {
    let bytes = value.to_bytes();
    let len = bytes.len();
    let mut buf = [0u8; BLANK_SCAN_CHUNK as usize];
    let mut start = 0;
    while start < len {
        let end = (start + BLANK_SCAN_CHUNK).min(len);
        let chunk = &mut buf[..(end - start) as usize];
        bytes.slice(start..end).copy_into_slice(chunk);
        if !chunk.iter().all(|b| b.is_ascii_whitespace()) {
            return false;
        }
        start = end;
    }
    true
}

fn validate_registration(registration: &HospitalRegistration) -> Result<(), PortalError> {
    let required = [
        &registration.hospital_name,
        &registration.address.address_line1,
        &registration.address.city,
        &registration.address.province,
        &registration.phone_primary,
        &registration.email,
        &registration.admin_full_name,
        &registration.admin_email,
        &registration.admin_phone,
    ];
    if required.iter().any(|field| is_blank(field)) {
        return Err(PortalError::InvalidInput);
    }
    if registration.hospital_name.len() > MAX_HOSPITAL_NAME_LEN {
        return Err(PortalError::NameTooLong);
    }
    Ok(())
}

/// Copies a validated hospital name into a stack buffer.
fn name_bytes(name: &String) -> ([u8; MAX_HOSPITAL_NAME_LEN as usize], usize) {
    let len = (name.len() as usize).min(MAX_HOSPITAL_NAME_LEN as usize);
    let mut buf = [0u8; MAX_HOSPITAL_NAME_LEN as usize];
    name.copy_into_slice(&mut buf[..len]);
    (buf, len)
}

/// `"City General-East"` becomes `"city_general_east_admin"`.
fn write_base_username(name: &[u8], out: &mut [u8]) -> usize {
    let mut n = 0;
    for &b in name {
        out[n] = match b {
            b' ' | b'-' => b'_',
            _ => b.to_ascii_lowercase(),
        };
        n += 1;
    }
    out[n..n + ADMIN_SUFFIX.len()].copy_from_slice(ADMIN_SUFFIX);
    n + ADMIN_SUFFIX.len()
}

/// First free admin username for a hospital name: the base form, then the
/// base form with `_2` … `_99` appended.
pub fn derive_admin_username(env: &Env, hospital_name: &String) -> Result<String, PortalError> {
    let (name, len) = name_bytes(hospital_name);
    let mut buf = [0u8; USERNAME_BUF_LEN];
    let base_len = write_base_username(&name[..len], &mut buf);

    let candidate = String::from_bytes(env, &buf[..base_len]);
    if !storage::admin_username_taken(env, &candidate) {
        return Ok(candidate);
    }

    for suffix in 2..=MAX_USERNAME_SUFFIX {
        let mut n = base_len;
        buf[n] = b'_';
        n += 1;
        if suffix >= 10 {
            buf[n] = b'0' + (suffix / 10) as u8;
            n += 1;
        }
        buf[n] = b'0' + (suffix % 10) as u8;
        n += 1;

        let candidate = String::from_bytes(env, &buf[..n]);
        if !storage::admin_username_taken(env, &candidate) {
            return Ok(candidate);
        }
    }
    Err(PortalError::UsernameTaken)
}

/// The first two whitespace-separated words of the name, concatenated,
/// truncated to six characters and ASCII-uppercased. Truncation never splits
/// a multi-byte character.
pub fn code_prefix(name: &[u8], out: &mut [u8; CODE_PREFIX_MAX_BYTES]) -> usize {
    let mut n = 0;
    let mut chars = 0;
    for word in name
        .split(|b| b.is_ascii_whitespace())
        .filter(|word| !word.is_empty())
        .take(2)
    {
        for &b in word {
            let starts_char = (b & 0xC0) != 0x80;
            if starts_char {
                if chars == CODE_PREFIX_LEN {
                    return n;
                }
                chars += 1;
            }
            if n == CODE_PREFIX_MAX_BYTES {
                return n;
            }
            out[n] = b.to_ascii_uppercase();
            n += 1;
        }
    }
    n
}

/// Draws codes of the form `PREFIX` + four random digits until one is free.
pub fn generate_hospital_code(env: &Env, hospital_name: &String) -> Result<String, PortalError> {
    let (name, len) = name_bytes(hospital_name);
    let mut prefix = [0u8; CODE_PREFIX_MAX_BYTES];
    let prefix_len = code_prefix(&name[..len], &mut prefix);

    let mut buf = [0u8; CODE_BUF_LEN];
    buf[..prefix_len].copy_from_slice(&prefix[..prefix_len]);
    let total = prefix_len + CODE_DIGITS;

    for _ in 0..MAX_CODE_ATTEMPTS {
        fill_random_digits(env, &mut buf[prefix_len..total]);
        let code = String::from_bytes(env, &buf[..total]);
        if !storage::hospital_code_taken(env, &code) {
            return Ok(code);
        }
    }
    log!(env, "hospital code space exhausted", hospital_name.clone());
    Err(PortalError::CodeSpaceExhausted)
}

/// Creates a hospital and its first admin for the caller's ministry.
///
/// Every check runs before the first write, so a rejected registration leaves
/// no partial rows behind.
pub fn add_hospital(
    env: &Env,
    principal: &MinistryPrincipal,
    registration: HospitalRegistration,
    origin: &RequestOrigin,
) -> Result<ProvisionedHospital, PortalError> {
    validate_registration(&registration)?;

    let admin_username = derive_admin_username(env, &registration.hospital_name)?;
    if storage::admin_email_taken(env, &registration.admin_email) {
        return Err(PortalError::EmailTaken);
    }
    let hospital_code = generate_hospital_code(env, &registration.hospital_name)?;

    let settings = config::load(env);
    let admin_password = generate_password(env, settings.admin_password_length);
    let now = env.ledger().timestamp();

    let hospital = Hospital {
        id: storage::next_id(env, &KIND_HOSPITAL),
        name: registration.hospital_name.clone(),
        ministry_id: principal.ministry_id,
        code: hospital_code.clone(),
        address: registration.address,
        contact_info: ContactInfo {
            phone: Some(registration.phone_primary),
            email: Some(registration.email),
            address: None,
        },
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    storage::set_hospital(env, &hospital);
    storage::index_hospital(env, &hospital);

    let admin = HospitalAdmin {
        id: storage::next_id(env, &KIND_ADMIN),
        hospital_id: hospital.id,
        username: admin_username.clone(),
        password: hash_password(env, &admin_password),
        full_name: registration.admin_full_name,
        email: registration.admin_email.clone(),
        contact_info: ContactInfo {
            phone: Some(registration.admin_phone),
            email: Some(registration.admin_email),
            address: None,
        },
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    storage::set_hospital_admin(env, &admin);
    storage::index_hospital_admin(env, &admin);

    events::publish_hospital_created(
        env,
        hospital.id,
        principal.ministry_id,
        hospital_code.clone(),
    );
    audit::record(
        env,
        AuditEntry::new(
            env,
            ActorType::Ministry,
            Some(principal.ministry_id),
            audit::HOSPITAL_CREATED,
        )
        .hospital(hospital.id)
        .detail(Symbol::new(env, "hospital_name"), hospital.name.clone())
        .detail(Symbol::new(env, "hospital_code"), hospital_code.clone())
        .origin(origin),
    );

    Ok(ProvisionedHospital {
        hospital,
        hospital_code,
        admin_username,
        admin_password,
    })
}

/// Flips a hospital's `is_active` flag and returns the new state.
pub fn toggle_hospital_status(
    env: &Env,
    principal: &MinistryPrincipal,
    hospital_id: u64,
    origin: &RequestOrigin,
) -> Result<bool, PortalError> {
    let mut hospital = guard::owned_hospital(env, principal.ministry_id, hospital_id)?;
    let now = env.ledger().timestamp();

    hospital.is_active = !hospital.is_active;
    hospital.updated_at = now;
    storage::set_hospital(env, &hospital);

    let cascaded = !hospital.is_active && config::load(env).cascade_deactivation;
    if cascaded {
        deactivate_dependents(env, hospital.id, now);
    }

    let action = if hospital.is_active {
        audit::HOSPITAL_ACTIVATED
    } else {
        audit::HOSPITAL_DEACTIVATED
    };
    events::publish_hospital_status(env, hospital.id, hospital.is_active, cascaded);
    audit::record(
        env,
        AuditEntry::new(env, ActorType::Ministry, Some(principal.ministry_id), action)
            .hospital(hospital.id)
            .detail(Symbol::new(env, "hospital_name"), hospital.name.clone())
            .origin(origin),
    );

    Ok(hospital.is_active)
}

fn deactivate_dependents(env: &Env, hospital_id: u64, now: u64) {
    for id in storage::hospital_admin_ids(env, hospital_id).iter() {
        if let Some(mut admin) = storage::get_hospital_admin(env, id) {
            if admin.is_active {
                admin.is_active = false;
                admin.updated_at = now;
                storage::set_hospital_admin(env, &admin);
            }
        }
    }
    for id in storage::hospital_doctor_ids(env, hospital_id).iter() {
        if let Some(mut doctor) = storage::get_doctor(env, id) {
            if doctor.is_active {
                doctor.is_active = false;
                doctor.updated_at = now;
                storage::set_doctor(env, &doctor);
            }
        }
    }
    for id in storage::hospital_patient_ids(env, hospital_id).iter() {
        if let Some(mut patient) = storage::get_patient(env, id) {
            if patient.is_active {
                patient.is_active = false;
                patient.updated_at = now;
                storage::set_patient(env, &patient);
            }
        }
    }
}
