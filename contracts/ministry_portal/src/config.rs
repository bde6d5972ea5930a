use crate::errors::PortalError;
use crate::storage;
use crate::types::PortalConfig;
use portal_common::{MAX_GENERATED_LEN, MIN_PASSWORD_LEN};
use soroban_sdk::Env;

pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 8 * 60 * 60;
pub const DEFAULT_ADMIN_PASSWORD_LENGTH: u32 = 10;
const MAX_SESSION_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

pub fn default_config() -> PortalConfig {
    PortalConfig {
        session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        admin_password_length: DEFAULT_ADMIN_PASSWORD_LENGTH,
        cascade_deactivation: false,
        audit_capacity: 0,
    }
}

pub fn validate(config: &PortalConfig) -> Result<(), PortalError> {
    if config.session_ttl_seconds == 0 || config.session_ttl_seconds > MAX_SESSION_TTL_SECONDS {
        return Err(PortalError::InvalidConfig);
    }
    if !(MIN_PASSWORD_LEN..=MAX_GENERATED_LEN).contains(&config.admin_password_length) {
        return Err(PortalError::InvalidConfig);
    }
    Ok(())
}

/// Active configuration, falling back to defaults before `set_config`.
pub fn load(env: &Env) -> PortalConfig {
    storage::get_config(env).unwrap_or_else(default_config)
}
