use tracing::info;
use tracing_subscriber::EnvFilter;

use listing_api_check::cases;
use listing_api_check::config::CONFIG;
use listing_api_check::report::{self, CaseReport};
use listing_api_check::request::ListingClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let selected: Vec<cases::Case> = cases::all_cases()
        .into_iter()
        .filter(|case| match &CONFIG.filter {
            Some(filter) => case.name().contains(filter.as_str()),
            None => true,
        })
        .collect();

    if CONFIG.list {
        for case in &selected {
            println!("{}", case.name());
        }
        return Ok(());
    }

    if selected.is_empty() {
        return Err(format!(
            "No case matches filter '{}'",
            CONFIG.filter.as_deref().unwrap_or_default()
        )
        .into());
    }

    let client = ListingClient::new(&CONFIG.base_url);
    println!(
        "Checking {} cases against {}",
        selected.len(),
        client.base_url()
    );

    let mut reports = vec![];
    for case in &selected {
        let name = case.name();
        info!("Running {}", name);
        let outcome = case.run(&client).settle(&CONFIG.fixed_bugs);
        reports.push(CaseReport { name, outcome });
    }

    report::print_report(&reports);

    if let Some(path) = &CONFIG.output_csv {
        report::write_csv(path, &reports)?;
    }

    if reports.iter().any(|report| report.outcome.is_failed()) {
        std::process::exit(1);
    }

    Ok(())
}
