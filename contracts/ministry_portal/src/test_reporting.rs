#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::test::{
    add_hospital_with_admin, create_ministry, date, doctor_registration, encounter_input,
    hospital_registration, login_ministry, origin, patient_registration, setup_portal, Portal,
    DAY, MARCH_15_2024,
};
use crate::PortalError;
use soroban_sdk::{testutils::Ledger, Address, String, Symbol};

/// Registers a doctor and `patients` patients at a hospital, then records one
/// encounter per date. Returns `(doctor_id, first_patient_id)`.
fn populate(
    portal: &Portal,
    hospital_admin: &Address,
    license: &str,
    patients: u32,
    treatment_dates: &[(u32, u32, u32)],
) -> (u64, u64) {
    let env = &portal.env;
    let doctor = portal
        .client
        .register_doctor(hospital_admin, &doctor_registration(env, license));
    let mut first_patient = 0;
    for i in 0..patients {
        let patient = portal
            .client
            .register_patient(hospital_admin, &patient_registration(env, "Patient", None));
        if i == 0 {
            first_patient = patient.id;
        }
    }
    for &(y, m, d) in treatment_dates {
        portal.client.record_encounter(
            hospital_admin,
            &encounter_input(env, first_patient, doctor.id, date(y, m, d)),
        );
    }
    (doctor.id, first_patient)
}

// ── Dashboard ────────────────────────────────────────────────────────────────

#[test]
fn test_dashboard_counts_only_active_hospitals() {
    let portal = setup_portal();
    let (active, active_admin) = add_hospital_with_admin(&portal, "City General", "a@city.lk");
    let (closed, closed_admin) = add_hospital_with_admin(&portal, "Lakeside", "a@lake.lk");

    populate(&portal, &active_admin, "SLMC-1", 3, &[(2024, 3, 1), (2024, 3, 2)]);
    portal
        .client
        .register_doctor(&active_admin, &doctor_registration(&portal.env, "SLMC-2"));
    populate(&portal, &closed_admin, "SLMC-3", 1, &[(2024, 3, 3)]);

    portal
        .client
        .toggle_hospital_status(&portal.officer, &closed, &origin(&portal.env));

    let view = portal.client.dashboard(&portal.officer);
    assert_eq!(view.total_hospitals, 1);
    assert_eq!(view.total_doctors, 2);
    assert_eq!(view.total_patients, 3);
    assert_eq!(view.total_encounters, 2);
    assert_eq!(view.recent_hospitals.len(), 1);
    assert_eq!(view.recent_hospitals.get(0).unwrap().id, active);
    assert_eq!(view.recent_activity.len(), 10);
    assert_eq!(
        view.recent_activity.get(0).unwrap().action,
        Symbol::new(&portal.env, "hospital_deactivated")
    );
}

#[test]
fn test_dashboard_recent_hospitals_newest_first() {
    let portal = setup_portal();
    let env = &portal.env;
    let mut ids = [0u64; 6];
    let names = ["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot"];
    let emails = ["a@x.lk", "b@x.lk", "c@x.lk", "d@x.lk", "e@x.lk", "f@x.lk"];
    for i in 0..6 {
        env.ledger().set_timestamp(MARCH_15_2024 + i as u64);
        ids[i] = portal
            .client
            .add_hospital(
                &portal.officer,
                &hospital_registration(env, names[i], emails[i]),
                &origin(env),
            )
            .hospital
            .id;
    }

    let recent = portal.client.dashboard(&portal.officer).recent_hospitals;
    assert_eq!(recent.len(), 5);
    for (slot, expected) in [ids[5], ids[4], ids[3], ids[2], ids[1]].iter().enumerate() {
        assert_eq!(recent.get(slot as u32).unwrap().id, *expected);
    }
}

#[test]
fn test_ministries_never_see_each_others_data() {
    let portal = setup_portal();
    let (hospital_id, hospital_admin) =
        add_hospital_with_admin(&portal, "City General", "a@city.lk");
    populate(&portal, &hospital_admin, "SLMC-1", 2, &[(2024, 3, 1)]);

    create_ministry(&portal.env, &portal.client, &portal.admin, "Provincial Ministry", "pm");
    let rival = login_ministry(&portal.env, &portal.client, "pm");

    let view = portal.client.dashboard(&rival);
    assert_eq!(view.total_hospitals, 0);
    assert_eq!(view.total_doctors, 0);
    assert_eq!(view.total_patients, 0);
    assert_eq!(view.total_encounters, 0);
    assert_eq!(portal.client.list_hospitals(&rival).len(), 0);
    assert_eq!(portal.client.list_patients(&rival).len(), 0);
    assert_eq!(portal.client.list_doctors(&rival).len(), 0);
    assert_eq!(portal.client.analytics(&rival).monthly_encounters.len(), 0);
    assert_eq!(
        portal.client.try_hospital_details(&rival, &hospital_id),
        Err(Ok(PortalError::HospitalNotFound))
    );
}

// ── Listings ─────────────────────────────────────────────────────────────────

#[test]
fn test_list_hospitals_summaries() {
    let portal = setup_portal();
    let (hospital_id, hospital_admin) =
        add_hospital_with_admin(&portal, "City General", "a@city.lk");
    populate(&portal, &hospital_admin, "SLMC-1", 2, &[(2024, 3, 1), (2024, 3, 5)]);

    let summaries = portal.client.list_hospitals(&portal.officer);
    assert_eq!(summaries.len(), 1);
    let summary = summaries.get(0).unwrap();
    assert_eq!(summary.hospital.id, hospital_id);
    assert_eq!(summary.doctor_count, 1);
    assert_eq!(summary.patient_count, 2);
    assert_eq!(summary.encounter_count, 2);
    let admin = summary.admin.unwrap();
    assert_eq!(admin.email, String::from_str(&portal.env, "a@city.lk"));
}

#[test]
fn test_list_patients_and_doctors_carry_hospital_name() {
    let portal = setup_portal();
    let (city, city_admin) = add_hospital_with_admin(&portal, "City General", "a@city.lk");
    let (lake, lake_admin) = add_hospital_with_admin(&portal, "Lakeside", "a@lake.lk");
    populate(&portal, &city_admin, "SLMC-1", 1, &[]);
    populate(&portal, &lake_admin, "SLMC-2", 2, &[]);

    let patients = portal.client.list_patients(&portal.officer);
    assert_eq!(patients.len(), 3);
    assert_eq!(patients.get(0).unwrap().hospital_id, city);
    assert_eq!(
        patients.get(2).unwrap().hospital_name,
        String::from_str(&portal.env, "Lakeside")
    );

    let doctors = portal.client.list_doctors(&portal.officer);
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors.get(1).unwrap().hospital_id, lake);

    portal
        .client
        .toggle_hospital_status(&portal.officer, &lake, &origin(&portal.env));
    assert_eq!(portal.client.list_patients(&portal.officer).len(), 1);
    assert_eq!(portal.client.list_doctors(&portal.officer).len(), 1);
}

// ── Hospital details ─────────────────────────────────────────────────────────

#[test]
fn test_hospital_details_computes_ages() {
    let portal = setup_portal();
    let env = &portal.env;
    let (hospital_id, hospital_admin) =
        add_hospital_with_admin(&portal, "City General", "a@city.lk");
    portal.client.register_patient(
        &hospital_admin,
        &patient_registration(env, "Born June 2000", Some(date(2000, 6, 15))),
    );
    portal
        .client
        .register_patient(&hospital_admin, &patient_registration(env, "Unknown DOB", None));

    let view = portal.client.hospital_details(&portal.officer, &hospital_id);
    assert_eq!(view.patients.len(), 2);
    assert_eq!(view.patients.get(0).unwrap().age, Some(23));
    assert_eq!(view.patients.get(1).unwrap().age, None);

    // 2024-06-15, the birthday itself.
    env.ledger().set_timestamp(MARCH_15_2024 + 92 * DAY);
    let officer = login_ministry(env, &portal.client, "moh");
    let view = portal.client.hospital_details(&officer, &hospital_id);
    assert_eq!(view.patients.get(0).unwrap().age, Some(24));
}

#[test]
fn test_hospital_details_encounters_this_month() {
    let portal = setup_portal();
    let (hospital_id, hospital_admin) =
        add_hospital_with_admin(&portal, "City General", "a@city.lk");
    populate(
        &portal,
        &hospital_admin,
        "SLMC-1",
        1,
        &[(2024, 2, 29), (2024, 3, 1), (2024, 3, 14)],
    );

    let view = portal.client.hospital_details(&portal.officer, &hospital_id);
    assert_eq!(view.encounters_this_month, 2);
    assert_eq!(view.doctors.len(), 1);
    assert!(view.admin.is_some());
    // hospital_created, hadmin_login, doctor, patient, three encounters
    assert_eq!(view.audit_logs.len(), 7);
    assert_eq!(
        view.audit_logs.get(0).unwrap().action,
        Symbol::new(&portal.env, "encounter_recorded")
    );
}

#[test]
fn test_hospital_details_of_inactive_hospital_is_not_found() {
    let portal = setup_portal();
    let (hospital_id, _) = add_hospital_with_admin(&portal, "City General", "a@city.lk");
    portal
        .client
        .toggle_hospital_status(&portal.officer, &hospital_id, &origin(&portal.env));

    assert_eq!(
        portal
            .client
            .try_hospital_details(&portal.officer, &hospital_id),
        Err(Ok(PortalError::HospitalNotFound))
    );
}

// ── Analytics ────────────────────────────────────────────────────────────────

#[test]
fn test_monthly_encounters_are_sparse_and_ascending() {
    let portal = setup_portal();
    let env = &portal.env;
    let (_, hospital_admin) = add_hospital_with_admin(&portal, "City General", "a@city.lk");
    populate(
        &portal,
        &hospital_admin,
        "SLMC-1",
        1,
        &[
            (2024, 3, 2),
            (2024, 1, 20),
            (2024, 1, 10),
            (2023, 3, 15),
            (2023, 3, 14),
        ],
    );

    let monthly = portal.client.analytics(&portal.officer).monthly_encounters;
    assert_eq!(monthly.len(), 3);

    let first = monthly.get(0).unwrap();
    assert_eq!(first.label, String::from_str(env, "2023-03"));
    assert_eq!(first.count, 1);

    let second = monthly.get(1).unwrap();
    assert_eq!(second.label, String::from_str(env, "2024-01"));
    assert_eq!(second.count, 2);

    let third = monthly.get(2).unwrap();
    assert_eq!(third.label, String::from_str(env, "2024-03"));
    assert_eq!(third.count, 1);
}

#[test]
fn test_hospital_stats_count_distinct_doctors() {
    let portal = setup_portal();
    let env = &portal.env;
    let (busy, busy_admin) = add_hospital_with_admin(&portal, "City General", "a@city.lk");
    let (quiet, _) = add_hospital_with_admin(&portal, "Lakeside", "a@lake.lk");

    let (first_doctor, patient) =
        populate(&portal, &busy_admin, "SLMC-1", 2, &[(2024, 3, 1), (2024, 3, 2)]);
    let second_doctor = portal
        .client
        .register_doctor(&busy_admin, &doctor_registration(env, "SLMC-2"));
    portal.client.record_encounter(
        &busy_admin,
        &encounter_input(env, patient, second_doctor.id, date(2024, 3, 3)),
    );
    assert_ne!(first_doctor, second_doctor.id);

    let stats = portal.client.analytics(&portal.officer).hospital_stats;
    assert_eq!(stats.len(), 2);

    let busy_stats = stats.get(0).unwrap();
    assert_eq!(busy_stats.hospital_id, busy);
    assert_eq!(busy_stats.encounter_count, 3);
    assert_eq!(busy_stats.patient_count, 2);
    assert_eq!(busy_stats.doctor_count, 2);

    let quiet_stats = stats.get(1).unwrap();
    assert_eq!(quiet_stats.hospital_id, quiet);
    assert_eq!(quiet_stats.encounter_count, 0);
    assert_eq!(quiet_stats.patient_count, 0);
    assert_eq!(quiet_stats.doctor_count, 0);
}

#[test]
fn test_inactive_hospital_counts_in_trend_but_not_stats() {
    let portal = setup_portal();
    let (closed, closed_admin) = add_hospital_with_admin(&portal, "Lakeside", "a@lake.lk");
    populate(&portal, &closed_admin, "SLMC-1", 1, &[(2024, 2, 1)]);
    portal
        .client
        .toggle_hospital_status(&portal.officer, &closed, &origin(&portal.env));

    let view = portal.client.analytics(&portal.officer);
    assert_eq!(view.monthly_encounters.len(), 1);
    assert_eq!(view.hospital_stats.len(), 0);
}

// ── Audit viewer ─────────────────────────────────────────────────────────────

#[test]
fn test_audit_logs_paginate_newest_first() {
    let portal = setup_portal();
    let env = &portal.env;
    env.cost_estimate().budget().reset_unlimited();
    let (_, hospital_admin) = add_hospital_with_admin(&portal, "City General", "a@city.lk");
    // ministry_login, hospital_created, hadmin_login so far.
    for _ in 0..52 {
        portal
            .client
            .register_patient(&hospital_admin, &patient_registration(env, "Patient", None));
    }

    let first = portal.client.audit_logs(&portal.officer, &1);
    assert_eq!(first.page, 1);
    assert_eq!(first.per_page, 50);
    assert_eq!(first.total, 55);
    assert_eq!(first.items.len(), 50);
    assert_eq!(
        first.items.get(0).unwrap().action,
        Symbol::new(env, "patient_registered")
    );

    let second = portal.client.audit_logs(&portal.officer, &2);
    assert_eq!(second.items.len(), 5);
    assert_eq!(
        second.items.get(4).unwrap().action,
        Symbol::new(env, "ministry_login")
    );
    assert!(first.items.get(49).unwrap().id > second.items.get(0).unwrap().id);

    assert_eq!(portal.client.audit_logs(&portal.officer, &3).items.len(), 0);
    assert_eq!(portal.client.audit_logs(&portal.officer, &0), first);
}

#[test]
fn test_audit_views_read_only_their_page_under_default_budget() {
    let portal = setup_portal();
    let env = &portal.env;
    env.cost_estimate().budget().reset_unlimited();
    let (hospital_id, hospital_admin) =
        add_hospital_with_admin(&portal, "City General", "a@city.lk");
    for _ in 0..60 {
        portal
            .client
            .register_patient(&hospital_admin, &patient_registration(env, "Patient", None));
    }
    // Activity of another tenant grows the shared ministry trail.
    create_ministry(env, &portal.client, &portal.admin, "Provincial Ministry", "pm");
    let rival = (0..150)
        .map(|_| login_ministry(env, &portal.client, "pm"))
        .last()
        .unwrap();
    env.cost_estimate().budget().reset_default();

    // 2 own ministry records, hadmin_login, 60 patients, 150 rival logins.
    let first = portal.client.audit_logs(&portal.officer, &1);
    assert_eq!(first.total, 213);
    assert_eq!(first.items.len(), 50);
    assert_eq!(
        first.items.get(0).unwrap().action,
        Symbol::new(env, "ministry_login")
    );

    let last = portal.client.audit_logs(&portal.officer, &5);
    assert_eq!(last.items.len(), 13);
    assert_eq!(
        last.items.get(12).unwrap().action,
        Symbol::new(env, "ministry_login")
    );
    assert_eq!(last.items.get(12).unwrap().acting_user_id, Some(portal.ministry_id));

    let theirs = portal.client.audit_logs(&rival, &1);
    assert_eq!(theirs.total, 152);

    let details = portal.client.hospital_details(&portal.officer, &hospital_id);
    assert_eq!(details.audit_logs.len(), 10);
    assert!(details
        .audit_logs
        .iter()
        .all(|record| record.hospital_id == Some(hospital_id)));

    let dashboard = portal.client.dashboard(&portal.officer);
    assert_eq!(dashboard.recent_activity.len(), 10);
}
