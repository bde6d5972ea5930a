#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Properties of generated hospital identities.
//!
//! Invariants tested:
//! - The code prefix is at most six whole characters drawn from the first two words
//! - Provisioned codes are the prefix followed by four digits
//! - Admin usernames never contain spaces, hyphens or uppercase letters
//! - Generated passwords are alphanumeric and of the configured length

use crate::common::{hospital_form, ministry_officer, origin, setup_test_env};
use ministry_portal::provisioning::{
    code_prefix, CODE_DIGITS, CODE_PREFIX_LEN, CODE_PREFIX_MAX_BYTES, MAX_HOSPITAL_NAME_LEN,
};
use portal_common::is_alphanumeric;
use proptest::prelude::*;

fn hospital_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z -]{0,40}"
}

fn to_bytes(value: &soroban_sdk::String) -> Vec<u8> {
    let mut buf = [0u8; 128];
    let len = value.len() as usize;
    value.copy_into_slice(&mut buf[..len]);
    buf[..len].to_vec()
}

proptest! {
    #[test]
    fn prop_code_prefix_shape(name in hospital_name()) {
        let mut out = [0u8; CODE_PREFIX_MAX_BYTES];
        let n = code_prefix(name.as_bytes(), &mut out);

        let joined: String = name.split_whitespace().take(2).collect();
        let expected: String =
            joined.to_ascii_uppercase().chars().take(CODE_PREFIX_LEN).collect();
        prop_assert_eq!(&out[..n], expected.as_bytes());
    }

    #[test]
    fn prop_code_prefix_is_whole_characters(name in "\\PC{1,24}( \\PC{1,24})?") {
        let mut out = [0u8; CODE_PREFIX_MAX_BYTES];
        let n = code_prefix(name.as_bytes(), &mut out);

        let prefix = core::str::from_utf8(&out[..n]);
        prop_assert!(prefix.is_ok());
        prop_assert!(prefix.unwrap().chars().count() <= CODE_PREFIX_LEN);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_provisioned_identity_shape(name in hospital_name()) {
        prop_assume!(name.len() <= MAX_HOSPITAL_NAME_LEN as usize && !name.trim().is_empty());

        let ctx = setup_test_env();
        let env = &ctx.env;
        let (_, officer) = ministry_officer(&ctx, "Ministry of Health", "moh");

        let provisioned = ctx
            .client
            .add_hospital(&officer, &hospital_form(env, &name, "admin@h.lk"), &origin(env));

        let code = to_bytes(&provisioned.hospital_code);
        let mut prefix = [0u8; CODE_PREFIX_MAX_BYTES];
        let prefix_len = code_prefix(name.as_bytes(), &mut prefix);
        prop_assert_eq!(code.len(), prefix_len + CODE_DIGITS);
        prop_assert_eq!(&code[..prefix_len], &prefix[..prefix_len]);
        prop_assert!(code[prefix_len..].iter().all(|b| b.is_ascii_digit()));

        let username = to_bytes(&provisioned.admin_username);
        prop_assert!(username.ends_with(b"_admin"));
        prop_assert!(!username.iter().any(|b| *b == b' ' || *b == b'-' || b.is_ascii_uppercase()));

        let password = to_bytes(&provisioned.admin_password);
        prop_assert_eq!(password.len(), 10);
        prop_assert!(is_alphanumeric(&password));
    }
}
