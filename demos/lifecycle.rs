/// lifecycle - one loan from proposal to disbursement with a syndicate of investors
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use microloan_lifecycle::{
    Approval, Disbursement, InMemoryStore, Investor, LifecycleService, LoanView, LogNotifier,
    Money, Rate, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== loan lifecycle ===\n");

    let time = Arc::new(SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )));
    let controller = time.test_control().unwrap();

    let service = LifecycleService::new(InMemoryStore::new(Arc::clone(&time)), LogNotifier);

    // 1. proposal
    println!("1. proposal");
    let loan = service.create_loan(
        "BORROWER-042",
        Money::from_major(5_000_000),
        Rate::from_percentage(18),
        Rate::from_percentage(12),
    )?;
    println!("  loan id: {}", loan.id);
    println!("  state: {}", loan.state);

    // 2. field validation
    controller.advance(Duration::days(2));
    println!("\n2. approval ({})", time.now().format("%Y-%m-%d"));
    let loan = service.approve_loan(
        &loan.id,
        Approval::new("https://photos.example/visit-042.jpg", "VALIDATOR-7", time.now()),
    )?;
    println!("  state: {}", loan.state);

    // 3. syndicated funding
    println!("\n3. funding");
    for (investor, amount) in [("INV-A", 2_000_000), ("INV-B", 1_500_000), ("INV-C", 1_500_000)] {
        controller.advance(Duration::hours(6));
        let loan = service.invest_loan(&loan.id, Investor::new(investor, Money::from_major(amount)))?;
        println!(
            "  {} invested {} -> total {} ({})",
            investor, amount, loan.total_invested, loan.state
        );
    }

    // an extra offer is refused once the principal is covered
    match service.invest_loan(&loan.id, Investor::new("INV-D", Money::from_major(1))) {
        Ok(_) => println!("  unexpected: late investment accepted"),
        Err(err) => println!("  late offer refused: {}", err),
    }

    // 4. disbursement
    controller.advance(Duration::days(5));
    println!("\n4. disbursement ({})", time.now().format("%Y-%m-%d"));
    let loan = service.disburse_loan(
        &loan.id,
        Disbursement::new("agreements/042-signed.pdf", "OFFICER-3", time.now()),
        "https://docs.example/agreements/042.pdf",
    )?;
    println!("  state: {}", loan.state);

    println!("\nfinal view:");
    println!("{}", LoanView::from_loan(&loan).to_json_pretty()?);

    Ok(())
}
