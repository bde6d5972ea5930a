//! Access checks shared by every entry point.

use crate::errors::PortalError;
use crate::storage;
use crate::types::Hospital;
use portal_common::{get_session, AuthSession, UserType};
use soroban_sdk::{Address, Env, String};

/// The ministry a guarded call acts for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MinistryPrincipal {
    pub ministry_id: u64,
    pub ministry_name: String,
}

/// The hospital admin a collaborator call acts for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HospitalPrincipal {
    pub admin_id: u64,
    pub hospital_id: u64,
}

pub fn require_initialized(env: &Env) -> Result<(), PortalError> {
    if !env.storage().instance().has(&storage::INITIALIZED) {
        return Err(PortalError::NotInitialized);
    }
    Ok(())
}

pub fn require_admin(env: &Env, caller: &Address) -> Result<(), PortalError> {
    require_initialized(env)?;
    caller.require_auth();
    let admin = storage::get_admin(env).ok_or(PortalError::NotInitialized)?;
    if *caller != admin {
        return Err(PortalError::Unauthorized);
    }
    Ok(())
}

fn live_session(
    env: &Env,
    caller: &Address,
    user_type: UserType,
) -> Result<AuthSession, PortalError> {
    require_initialized(env)?;
    caller.require_auth();
    match get_session(env, caller) {
        Some(session) if session.user_type == user_type => Ok(session),
        _ => Err(PortalError::NotAuthenticated),
    }
}

/// Resolves the caller's ministry session.
///
/// A ministry deactivated after login loses access on its next call.
pub fn require_ministry(env: &Env, caller: &Address) -> Result<MinistryPrincipal, PortalError> {
    let session = live_session(env, caller, UserType::Ministry)?;
    let ministry = storage::get_ministry(env, session.tenant_id)
        .filter(|ministry| ministry.is_active)
        .ok_or(PortalError::NotAuthenticated)?;
    Ok(MinistryPrincipal {
        ministry_id: ministry.id,
        ministry_name: ministry.name,
    })
}

/// Loads a hospital only if it belongs to `ministry_id`. Another tenant's
/// hospital is reported as missing.
pub fn owned_hospital(
    env: &Env,
    ministry_id: u64,
    hospital_id: u64,
) -> Result<Hospital, PortalError> {
    storage::get_hospital(env, hospital_id)
        .filter(|hospital| hospital.ministry_id == ministry_id)
        .ok_or(PortalError::HospitalNotFound)
}

pub fn require_hospital_admin(
    env: &Env,
    caller: &Address,
) -> Result<HospitalPrincipal, PortalError> {
    let session = live_session(env, caller, UserType::HospitalAdmin)?;
    let admin = storage::get_hospital_admin(env, session.subject_id)
        .filter(|admin| admin.is_active)
        .ok_or(PortalError::NotAuthenticated)?;
    let hospital = storage::get_hospital(env, admin.hospital_id)
        .ok_or(PortalError::HospitalNotFound)?;
    if !hospital.is_active {
        return Err(PortalError::HospitalInactive);
    }
    Ok(HospitalPrincipal {
        admin_id: admin.id,
        hospital_id: hospital.id,
    })
}
