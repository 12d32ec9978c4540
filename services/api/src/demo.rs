use chrono::{Datelike, NaiveDate, Utc};
use clap::Args;
use emploseek::clients::{ClientDraft, ClientService};
use emploseek::contracts::{
    ContractFields, ContractLifecycleService, ContractNumberGenerator, ContractStatus,
    LifecyclePolicy, RandomContractNumbers, VerificationError, VerificationQuery,
    VerificationService,
};
use emploseek::error::AppError;
use emploseek::offers::{OfferDeletionPolicy, OfferDraft, OfferService, OpportunityType};
use emploseek::store::MemoryStore;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Contract start date (YYYY-MM-DD). Defaults to 2024-01-01.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Email tried for the failing verification attempt.
    #[arg(long, default_value = "wrong@x.com")]
    pub(crate) wrong_email: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ContractNumberArgs {
    /// Year embedded in the number (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn print_contract_number(args: ContractNumberArgs) {
    let year = args.year.unwrap_or_else(|| Utc::now().year());
    println!("{}", RandomContractNumbers.generate(year));
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start_date,
        wrong_email,
    } = args;
    let start_date = start_date
        .or_else(|| NaiveDate::from_ymd_opt(2024, 1, 1))
        .unwrap_or_else(|| Utc::now().date_naive());

    let store = Arc::new(MemoryStore::new());
    let clients = ClientService::new(store.clone());
    let offers = OfferService::new(store.clone(), OfferDeletionPolicy::default());
    let contracts = ContractLifecycleService::new(
        store.clone(),
        Arc::new(RandomContractNumbers),
        LifecyclePolicy::default(),
    );
    let verification = VerificationService::new(store);

    println!("EmploSeek contract demo");
    let client = clients.create(ClientDraft {
        first_name: "Jean".to_string(),
        last_name: "Dupont".to_string(),
        email: "jean@x.com".to_string(),
        phone: None,
    })?;
    println!(
        "- Client {} {} <{}> ({})",
        client.first_name, client.last_name, client.email, client.id
    );

    let offer = offers.create(OfferDraft {
        title: "Developpeur Rust".to_string(),
        company: "Atelier Nord".to_string(),
        location: "Lyon".to_string(),
        kind: OpportunityType::Emploi,
        duration: None,
        description: "Poste backend en CDI".to_string(),
        is_active: true,
    })?;
    println!(
        "- Offer \"{}\" at {} [{}]",
        offer.title,
        offer.company,
        offer.kind.label()
    );

    let contract = contracts.create(ContractFields {
        client_id: client.id,
        offer_id: Some(offer.id),
        kind: OpportunityType::Emploi,
        status: ContractStatus::Pending,
        start_date,
        end_date: None,
        notes: None,
    })?;
    println!(
        "- Contract {} created with status {} from {}",
        contract.contract_number, contract.fields.status, contract.fields.start_date
    );

    println!("\nPublic verification");
    for email in [client.email.as_str(), wrong_email.as_str()] {
        let query = VerificationQuery::new(contract.contract_number.as_str(), email);
        match verification.verify(&query) {
            Ok(view) => println!(
                "  {} / {} -> {} for {} {}",
                view.contract_number,
                email,
                view.status,
                view.client.first_name,
                view.client.last_name
            ),
            Err(VerificationError::NotFound) => println!(
                "  {} / {} -> {}",
                contract.contract_number,
                email,
                VerificationError::NotFound
            ),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
