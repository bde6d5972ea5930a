#![allow(dead_code)]

use ministry_portal::{
    types::{
        ContactInfo, DoctorRegistration, EncounterInput, HospitalAddress, HospitalRegistration,
        MinistryRegistration, PatientRegistration, RequestOrigin,
    },
    MinistryPortalContract, MinistryPortalContractClient,
};
use portal_common::CivilDate;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, Env, String, Vec,
};

/// 2024-03-15T00:00:00Z
pub const NOW: u64 = 1_710_460_800;
pub const PASSWORD: &str = "correct-horse";

pub struct TestContext {
    pub env: Env,
    pub client: MinistryPortalContractClient<'static>,
    pub admin: Address,
}

/// Deploys and initializes the portal with the ledger clock at [`NOW`].
pub fn setup_test_env() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(NOW);

    let contract_id = env.register(MinistryPortalContract, ());
    let client = MinistryPortalContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin);

    TestContext { env, client, admin }
}

pub fn origin(env: &Env) -> RequestOrigin {
    RequestOrigin {
        ip_address: Some(String::from_str(env, "192.0.2.10")),
        user_agent: None,
    }
}

/// Sets up a ministry and returns an address holding a live session for it.
pub fn ministry_officer(ctx: &TestContext, name: &str, username: &str) -> (u64, Address) {
    let env = &ctx.env;
    let ministry = ctx.client.setup_ministry(
        &ctx.admin,
        &MinistryRegistration {
            name: String::from_str(env, name),
            admin_username: String::from_str(env, username),
            password: String::from_str(env, PASSWORD),
            contact_info: ContactInfo {
                phone: None,
                email: None,
                address: None,
            },
        },
    );
    let officer = Address::generate(env);
    ctx.client.login(
        &officer,
        &String::from_str(env, username),
        &String::from_str(env, PASSWORD),
        &origin(env),
    );
    (ministry.id, officer)
}

pub fn hospital_form(env: &Env, name: &str, admin_email: &str) -> HospitalRegistration {
    HospitalRegistration {
        hospital_name: String::from_str(env, name),
        address: HospitalAddress {
            address_line1: String::from_str(env, "1 Hospital Road"),
            city: String::from_str(env, "Kandy"),
            province: String::from_str(env, "Central"),
            postal_code: String::from_str(env, "20000"),
        },
        phone_primary: String::from_str(env, "+94812000000"),
        email: String::from_str(env, "info@hospital.lk"),
        admin_full_name: String::from_str(env, "Ayesha Fernando"),
        admin_email: String::from_str(env, admin_email),
        admin_phone: String::from_str(env, "+94770000000"),
    }
}

/// Onboards a hospital and logs its admin in. Returns
/// `(hospital_id, hospital_admin)`.
pub fn onboard_hospital(
    ctx: &TestContext,
    officer: &Address,
    name: &str,
    admin_email: &str,
) -> (u64, Address) {
    let env = &ctx.env;
    let provisioned = ctx
        .client
        .add_hospital(officer, &hospital_form(env, name, admin_email), &origin(env));
    let hospital_admin = Address::generate(env);
    ctx.client.hospital_login(
        &hospital_admin,
        &provisioned.admin_username,
        &provisioned.admin_password,
        &origin(env),
    );
    (provisioned.hospital.id, hospital_admin)
}

pub fn doctor_form(env: &Env, license: &str) -> DoctorRegistration {
    DoctorRegistration {
        license_no: String::from_str(env, license),
        password: String::from_str(env, "doctor-pass-1"),
        full_name: String::from_str(env, "Dr. Jayasuriya"),
        nic: None,
        email: None,
        phone: None,
        specialties: Vec::new(env),
    }
}

pub fn patient_form(env: &Env, name: &str, date_of_birth: Option<CivilDate>) -> PatientRegistration {
    PatientRegistration {
        full_name: String::from_str(env, name),
        date_of_birth,
        gender: None,
        address: None,
        phone: None,
        email: None,
        blood_type: None,
        guardian_number: None,
    }
}

pub fn encounter(
    env: &Env,
    patient_id: u64,
    doctor_id: u64,
    treatment_date: CivilDate,
) -> EncounterInput {
    EncounterInput {
        patient_id,
        doctor_id,
        receipt_number: None,
        diagnosis_text: String::from_str(env, "Dengue fever"),
        diagnosis_code: Some(String::from_str(env, "A90")),
        medicines: Vec::new(env),
        suggestions: None,
        treatment_date,
    }
}
