#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! State-machine tests for tenant isolation and hospital status.
//!
//! Two ministries onboard hospitals, toggle them and register patients in a
//! random order. After every step the contract must agree with a simple model.
//!
//! Invariants tested:
//! - Dashboard totals count only the caller's active hospitals and their patients
//! - Toggling another ministry's hospital always fails with `HospitalNotFound`
//! - Every toggle adds exactly one audit record
//! - Admins of inactive hospitals cannot write

use crate::common::{ministry_officer, onboard_hospital, origin, patient_form, setup_test_env};
use ministry_portal::PortalError;
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::Address;

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    AddHospital {
        second_ministry: bool,
    },
    Toggle {
        second_ministry: bool,
        #[proptest(strategy = "0usize..8")]
        slot: usize,
    },
    RegisterPatient {
        #[proptest(strategy = "0usize..8")]
        slot: usize,
    },
}

struct ModelHospital {
    id: u64,
    owner: usize,
    admin: Address,
    active: bool,
    patients: u32,
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_dashboard_tracks_model(ops in prop::collection::vec(any::<Op>(), 1..12)) {
        let ctx = setup_test_env();
        let env = &ctx.env;
        env.cost_estimate().budget().reset_unlimited();

        let (_, first) = ministry_officer(&ctx, "Ministry of Health", "moh");
        let (_, second) = ministry_officer(&ctx, "Provincial Ministry", "pm");
        let officers = [first, second];
        let mut hospitals: Vec<ModelHospital> = Vec::new();

        for op in ops {
            match op {
                Op::AddHospital { second_ministry } => {
                    let owner = second_ministry as usize;
                    let n = hospitals.len();
                    let (id, admin) = onboard_hospital(
                        &ctx,
                        &officers[owner],
                        &format!("Hospital {n}"),
                        &format!("admin{n}@h.lk"),
                    );
                    hospitals.push(ModelHospital { id, owner, admin, active: true, patients: 0 });
                }
                Op::Toggle { second_ministry, slot } => {
                    if hospitals.is_empty() {
                        continue;
                    }
                    let caller = second_ministry as usize;
                    let idx = slot % hospitals.len();
                    let before = ctx.client.audit_logs(&officers[caller], &1).total;
                    let result = ctx.client.try_toggle_hospital_status(
                        &officers[caller],
                        &hospitals[idx].id,
                        &origin(env),
                    );
                    if hospitals[idx].owner == caller {
                        hospitals[idx].active = !hospitals[idx].active;
                        prop_assert_eq!(result, Ok(Ok(hospitals[idx].active)));
                        let after = ctx.client.audit_logs(&officers[caller], &1).total;
                        prop_assert_eq!(after, before + 1);
                    } else {
                        prop_assert_eq!(result, Err(Ok(PortalError::HospitalNotFound)));
                    }
                }
                Op::RegisterPatient { slot } => {
                    if hospitals.is_empty() {
                        continue;
                    }
                    let idx = slot % hospitals.len();
                    let result = ctx.client.try_register_patient(
                        &hospitals[idx].admin,
                        &patient_form(env, "Patient", None),
                    );
                    if hospitals[idx].active {
                        prop_assert!(result.is_ok());
                        hospitals[idx].patients += 1;
                    } else {
                        prop_assert_eq!(result.err(), Some(Ok(PortalError::HospitalInactive)));
                    }
                }
            }

            for (owner, officer) in officers.iter().enumerate() {
                let view = ctx.client.dashboard(officer);
                let active = hospitals.iter().filter(|h| h.owner == owner && h.active);
                let expected_hospitals = active.clone().count() as u32;
                let expected_patients: u32 = active.map(|h| h.patients).sum();
                prop_assert_eq!(view.total_hospitals, expected_hospitals);
                prop_assert_eq!(view.total_patients, expected_patients);
            }
        }
    }
}
