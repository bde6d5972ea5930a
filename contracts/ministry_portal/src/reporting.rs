//! Read-only ministry views. Every query is scoped through
//! `Hospital::ministry_id` of the principal's ministry.

use crate::audit;
use crate::errors::PortalError;
use crate::guard::{self, MinistryPrincipal};
use crate::storage;
use crate::types::{
    AdminSummary, AnalyticsView, AuditLogPage, DashboardView, DoctorListing, DoctorProfile,
    Hospital, HospitalDetailView, HospitalStats, HospitalSummary, MonthlyCount, PatientListing,
    PatientWithAge,
};
use portal_common::{month_label_from_key, CivilDate};
use soroban_sdk::{Env, Map, Vec};

pub const RECENT_HOSPITALS: u32 = 5;
pub const RECENT_ACTIVITY: u32 = 10;
pub const AUDIT_PAGE_SIZE: u32 = 50;
pub const ANALYTICS_WINDOW_MONTHS: u32 = 12;

fn all_hospitals(env: &Env, ministry_id: u64) -> Vec<Hospital> {
    let mut out = Vec::new(env);
    for id in storage::ministry_hospital_ids(env, ministry_id).iter() {
        if let Some(hospital) = storage::get_hospital(env, id) {
            out.push_back(hospital);
        }
    }
    out
}

/// Active hospitals of a ministry in creation order.
fn active_hospitals(env: &Env, ministry_id: u64) -> Vec<Hospital> {
    let mut out = Vec::new(env);
    for hospital in all_hospitals(env, ministry_id).iter() {
        if hospital.is_active {
            out.push_back(hospital);
        }
    }
    out
}

fn first_active_admin(env: &Env, hospital_id: u64) -> Option<AdminSummary> {
    storage::hospital_admin_ids(env, hospital_id)
        .iter()
        .filter_map(|id| storage::get_hospital_admin(env, id))
        .find(|admin| admin.is_active)
        .map(AdminSummary::from)
}

fn active_doctor_count(env: &Env, hospital_id: u64) -> u32 {
    storage::hospital_doctor_ids(env, hospital_id)
        .iter()
        .filter_map(|id| storage::get_doctor(env, id))
        .filter(|doctor| doctor.is_active)
        .count() as u32
}

fn active_patient_count(env: &Env, hospital_id: u64) -> u32 {
    storage::hospital_patient_ids(env, hospital_id)
        .iter()
        .filter_map(|id| storage::get_patient(env, id))
        .filter(|patient| patient.is_active)
        .count() as u32
}

pub fn dashboard(env: &Env, principal: &MinistryPrincipal) -> DashboardView {
    let hospitals = active_hospitals(env, principal.ministry_id);

    let mut total_doctors = 0u32;
    let mut total_patients = 0u32;
    let mut total_encounters = 0u32;
    for hospital in hospitals.iter() {
        total_doctors += active_doctor_count(env, hospital.id);
        total_patients += active_patient_count(env, hospital.id);
        total_encounters += storage::hospital_encounter_ids(env, hospital.id).len();
    }

    let mut recent_hospitals = Vec::new(env);
    let mut i = hospitals.len();
    while i > 0 && recent_hospitals.len() < RECENT_HOSPITALS {
        i -= 1;
        if let Some(hospital) = hospitals.get(i) {
            recent_hospitals.push_back(hospital);
        }
    }

    DashboardView {
        total_hospitals: hospitals.len(),
        total_doctors,
        total_patients,
        total_encounters,
        recent_hospitals,
        recent_activity: audit::recent_for_ministry(env, principal.ministry_id, RECENT_ACTIVITY),
    }
}

pub fn list_hospitals(env: &Env, principal: &MinistryPrincipal) -> Vec<HospitalSummary> {
    let mut out = Vec::new(env);
    for hospital in active_hospitals(env, principal.ministry_id).iter() {
        out.push_back(HospitalSummary {
            doctor_count: active_doctor_count(env, hospital.id),
            patient_count: active_patient_count(env, hospital.id),
            encounter_count: storage::hospital_encounter_ids(env, hospital.id).len(),
            admin: first_active_admin(env, hospital.id),
            hospital,
        });
    }
    out
}

pub fn hospital_details(
    env: &Env,
    principal: &MinistryPrincipal,
    hospital_id: u64,
) -> Result<HospitalDetailView, PortalError> {
    let hospital = guard::owned_hospital(env, principal.ministry_id, hospital_id)?;
    if !hospital.is_active {
        return Err(PortalError::HospitalNotFound);
    }

    let today = CivilDate::today(env);

    let mut doctors = Vec::new(env);
    for id in storage::hospital_doctor_ids(env, hospital.id).iter() {
        if let Some(doctor) = storage::get_doctor(env, id) {
            if doctor.is_active {
                doctors.push_back(DoctorProfile::from(doctor));
            }
        }
    }

    let mut patients = Vec::new(env);
    for id in storage::hospital_patient_ids(env, hospital.id).iter() {
        if let Some(patient) = storage::get_patient(env, id) {
            if patient.is_active {
                let age = patient.date_of_birth.map(|dob| dob.age_on(&today));
                patients.push_back(PatientWithAge { patient, age });
            }
        }
    }

    let month_start = today.first_of_month();
    let encounters_this_month = storage::hospital_encounter_ids(env, hospital.id)
        .iter()
        .filter_map(|id| storage::get_encounter(env, id))
        .filter(|encounter| encounter.treatment_date.is_on_or_after(&month_start))
        .count() as u32;

    Ok(HospitalDetailView {
        admin: first_active_admin(env, hospital.id),
        doctors,
        patients,
        encounters_this_month,
        audit_logs: audit::recent_for_hospital(env, hospital.id, RECENT_ACTIVITY),
        hospital,
    })
}

pub fn list_patients(env: &Env, principal: &MinistryPrincipal) -> Vec<PatientListing> {
    let mut out = Vec::new(env);
    for hospital in active_hospitals(env, principal.ministry_id).iter() {
        for id in storage::hospital_patient_ids(env, hospital.id).iter() {
            if let Some(patient) = storage::get_patient(env, id) {
                if patient.is_active {
                    out.push_back(PatientListing {
                        patient,
                        hospital_id: hospital.id,
                        hospital_name: hospital.name.clone(),
                    });
                }
            }
        }
    }
    out
}

pub fn list_doctors(env: &Env, principal: &MinistryPrincipal) -> Vec<DoctorListing> {
    let mut out = Vec::new(env);
    for hospital in active_hospitals(env, principal.ministry_id).iter() {
        for id in storage::hospital_doctor_ids(env, hospital.id).iter() {
            if let Some(doctor) = storage::get_doctor(env, id) {
                if doctor.is_active {
                    out.push_back(DoctorListing {
                        doctor: DoctorProfile::from(doctor),
                        hospital_id: hospital.id,
                        hospital_name: hospital.name.clone(),
                    });
                }
            }
        }
    }
    out
}

/// Encounter counts per calendar month over the trailing window, oldest
/// month first. Months with no encounters are omitted.
pub fn monthly_encounters(env: &Env, ministry_id: u64, today: &CivilDate) -> Vec<MonthlyCount> {
    let since = today.months_before(ANALYTICS_WINDOW_MONTHS);
    let mut counts: Map<u32, u32> = Map::new(env);

    for hospital in all_hospitals(env, ministry_id).iter() {
        for id in storage::hospital_encounter_ids(env, hospital.id).iter() {
            if let Some(encounter) = storage::get_encounter(env, id) {
                if encounter.treatment_date.is_on_or_after(&since) {
                    let key = encounter.treatment_date.month_key();
                    let count = counts.get(key).unwrap_or(0);
                    counts.set(key, count + 1);
                }
            }
        }
    }

    let mut out = Vec::new(env);
    for (key, count) in counts.iter() {
        out.push_back(MonthlyCount {
            label: month_label_from_key(env, key),
            count,
        });
    }
    out
}

pub fn hospital_stats(env: &Env, ministry_id: u64) -> Vec<HospitalStats> {
    let mut out = Vec::new(env);
    for hospital in active_hospitals(env, ministry_id).iter() {
        let encounter_ids = storage::hospital_encounter_ids(env, hospital.id);
        let mut doctors: Map<u64, bool> = Map::new(env);
        for id in encounter_ids.iter() {
            if let Some(encounter) = storage::get_encounter(env, id) {
                doctors.set(encounter.doctor_id, true);
            }
        }
        out.push_back(HospitalStats {
            hospital_id: hospital.id,
            name: hospital.name.clone(),
            encounter_count: encounter_ids.len(),
            patient_count: storage::hospital_patient_ids(env, hospital.id).len(),
            doctor_count: doctors.len(),
        });
    }
    out
}

pub fn analytics(env: &Env, principal: &MinistryPrincipal) -> AnalyticsView {
    let today = CivilDate::today(env);
    AnalyticsView {
        monthly_encounters: monthly_encounters(env, principal.ministry_id, &today),
        hospital_stats: hospital_stats(env, principal.ministry_id),
    }
}

/// Ministry-scoped audit trail, newest first. Page 0 is read as page 1.
pub fn audit_logs(env: &Env, principal: &MinistryPrincipal, page: u32) -> AuditLogPage {
    let page = page.max(1);
    let offset = (page - 1).saturating_mul(AUDIT_PAGE_SIZE);
    let (items, total) =
        audit::page_for_ministry(env, principal.ministry_id, offset, AUDIT_PAGE_SIZE);
    AuditLogPage {
        page,
        per_page: AUDIT_PAGE_SIZE,
        total,
        items,
    }
}
