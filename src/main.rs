//! Resident Services Form Engine
//!
//! Diagnostic binary: prints each form kind's rule table, runs a sample
//! validation pass, and probes the configured reference endpoint.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use resident_forms::address::AddressLevel;
use resident_forms::api::{HttpApi, ReferenceApi, SessionContext};
use resident_forms::config::ApiConfig;
use resident_forms::forms::{
    AnnouncementForm, ComplaintForm, DocumentRequestForm, RegistrationForm,
};
use resident_forms::submit::SubmitForm;
use resident_forms::validation::{grouped_message, FieldRule};

fn print_rules<T>(kind: &str, rules: &[FieldRule<T>]) {
    println!("\n📋 {kind} ({} rules)", rules.len());
    for rule in rules {
        println!("   • {:<28} {:?}", rule.label, rule.kind);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    println!("\n{}", "═".repeat(60));
    println!("🏛️  Resident Services Form Engine v0.2.0");
    println!("{}", "═".repeat(60));

    print_rules("Registration", &RegistrationForm::rules());
    print_rules("Complaint", &ComplaintForm::rules());
    print_rules("Document Request", &DocumentRequestForm::rules());
    print_rules("Announcement", &AnnouncementForm::rules());

    // Sample validation pass over a freshly opened registration form.
    let form = RegistrationForm::new();
    let violations = form.violations();
    println!(
        "\n🔎 Empty registration form reports {} outstanding problems:",
        violations.len()
    );
    println!("{}", grouped_message(&violations));

    // Optional connectivity probe.
    match ApiConfig::from_env() {
        Ok(config) => {
            info!(base_url = %config.base_url, "probing reference endpoint");
            let api = HttpApi::new(&config, SessionContext::default());
            match api.fetch_options(AddressLevel::Region, None).await {
                Ok(regions) => println!("\n🌐 Reference endpoint OK: {} regions", regions.len()),
                Err(e) => println!("\n⚠️  Reference endpoint unreachable: {e}"),
            }
        }
        Err(_) => {
            println!("\n💡 Set RESIDENT_API_BASE_URL to probe the reference endpoint.");
        }
    }

    Ok(())
}
