#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ministry_portal::types::{
    ContactInfo, EncounterInput, HospitalAddress, HospitalRegistration, MinistryRegistration,
    PatientRegistration, RequestOrigin,
};
use ministry_portal::{MinistryPortalContract, MinistryPortalContractClient};
use portal_common::CivilDate;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, Env, String, Vec,
};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    AddHospital { name: std::vec::Vec<u8>, email_seed: u8 },
    Toggle { slot: u8 },
    RegisterDoctor { slot: u8, license_seed: u16 },
    RegisterPatient { slot: u8, year: u32, month: u32, day: u32 },
    RecordEncounter { slot: u8, patient: u64, doctor: u64, year: u32, month: u32, day: u32 },
    AuditPage { page: u32 },
    AdvanceClock { seconds: u32 },
}

fn text(env: &Env, value: &str) -> String {
    String::from_str(env, value)
}

fuzz_target!(|actions: std::vec::Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_710_460_800);
    env.cost_estimate().budget().reset_unlimited();

    let contract_id = env.register(MinistryPortalContract, ());
    let client = MinistryPortalContractClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    client.initialize(&admin);
    client.setup_ministry(
        &admin,
        &MinistryRegistration {
            name: text(&env, "Ministry of Health"),
            admin_username: text(&env, "moh"),
            password: text(&env, "correct-horse"),
            contact_info: ContactInfo { phone: None, email: None, address: None },
        },
    );

    let origin = RequestOrigin { ip_address: None, user_agent: None };
    let officer = Address::generate(&env);
    client.login(&officer, &text(&env, "moh"), &text(&env, "correct-horse"), &origin);

    // (hospital_id, admin caller)
    let mut hospitals: std::vec::Vec<(u64, Address)> = std::vec::Vec::new();

    for action in actions.into_iter().take(32) {
        match action {
            FuzzAction::AddHospital { name, email_seed } => {
                let name = &name[..name.len().min(96)];
                let email = [b'a', b'0' + email_seed % 10, b'@', b'h', b'.', b'l', b'k'];
                let registration = HospitalRegistration {
                    hospital_name: String::from_bytes(&env, name),
                    address: HospitalAddress {
                        address_line1: text(&env, "1 Road"),
                        city: text(&env, "Kandy"),
                        province: text(&env, "Central"),
                        postal_code: text(&env, "20000"),
                    },
                    phone_primary: text(&env, "+94812000000"),
                    email: text(&env, "info@h.lk"),
                    admin_full_name: text(&env, "Admin"),
                    admin_email: String::from_bytes(&env, &email),
                    admin_phone: text(&env, "+94770000000"),
                };
                if let Ok(Ok(provisioned)) = client.try_add_hospital(&officer, &registration, &origin)
                {
                    let hospital_admin = Address::generate(&env);
                    let session = client.try_hospital_login(
                        &hospital_admin,
                        &provisioned.admin_username,
                        &provisioned.admin_password,
                        &origin,
                    );
                    assert!(session.is_ok(), "generated credentials must log in");
                    hospitals.push((provisioned.hospital.id, hospital_admin));
                }
            }
            FuzzAction::Toggle { slot } => {
                if let Some((id, _)) = hospitals.get(slot as usize % hospitals.len().max(1)) {
                    let _ = client.try_toggle_hospital_status(&officer, id, &origin);
                }
            }
            FuzzAction::RegisterDoctor { slot, license_seed } => {
                if let Some((_, caller)) = hospitals.get(slot as usize % hospitals.len().max(1)) {
                    let digits = [
                        b'L',
                        b'0' + (license_seed / 100 % 10) as u8,
                        b'0' + (license_seed / 10 % 10) as u8,
                        b'0' + (license_seed % 10) as u8,
                    ];
                    let _ = client.try_register_doctor(
                        caller,
                        &ministry_portal::types::DoctorRegistration {
                            license_no: String::from_bytes(&env, &digits),
                            password: text(&env, "doctor-pass-1"),
                            full_name: text(&env, "Doctor"),
                            nic: None,
                            email: None,
                            phone: None,
                            specialties: Vec::new(&env),
                        },
                    );
                }
            }
            FuzzAction::RegisterPatient { slot, year, month, day } => {
                if let Some((_, caller)) = hospitals.get(slot as usize % hospitals.len().max(1)) {
                    let _ = client.try_register_patient(
                        caller,
                        &PatientRegistration {
                            full_name: text(&env, "Patient"),
                            date_of_birth: Some(CivilDate { year, month, day }),
                            gender: None,
                            address: None,
                            phone: None,
                            email: None,
                            blood_type: None,
                            guardian_number: None,
                        },
                    );
                }
            }
            FuzzAction::RecordEncounter { slot, patient, doctor, year, month, day } => {
                if let Some((_, caller)) = hospitals.get(slot as usize % hospitals.len().max(1)) {
                    let _ = client.try_record_encounter(
                        caller,
                        &EncounterInput {
                            patient_id: patient % 8,
                            doctor_id: doctor % 8,
                            receipt_number: None,
                            diagnosis_text: text(&env, "Fever"),
                            diagnosis_code: None,
                            medicines: Vec::new(&env),
                            suggestions: None,
                            treatment_date: CivilDate { year, month, day },
                        },
                    );
                }
            }
            FuzzAction::AuditPage { page } => {
                let _ = client.try_audit_logs(&officer, &page);
            }
            FuzzAction::AdvanceClock { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now.saturating_add(seconds as u64 % 3_600));
            }
        }

        // Reporting must never trap while the session is live.
        if client.current_session(&officer).is_some() {
            let dashboard = client.dashboard(&officer);
            assert!(dashboard.total_hospitals as usize <= hospitals.len());
            let _ = client.analytics(&officer);
            let _ = client.list_hospitals(&officer);
        }
    }
});
