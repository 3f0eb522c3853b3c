/// quick start - generate a dynamic-rent payment schedule
use lease_finance_rs::chrono::NaiveDate;
use lease_finance_rs::{Money, PlanRequest, Rate, SafeTimeProvider, TimeSource};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    // 50,000 vehicle, 10,000 down, 12 months at 12%/year
    let plan = PlanRequest::dynamic_rent(
        Money::from_major(50_000),
        Money::from_major(10_000),
        "12 Months",
        Rate::from_decimal(dec!(0.12)),
        start,
    )
    .build(&time)?;

    println!("first payment: {}", plan.monthly_amount);
    println!("total payable: {}", plan.total_amount);
    println!("total rent:    {}", plan.total_rent);

    for entry in &plan.schedule {
        println!(
            "  {} {:>10}  (principal {}, rent {})",
            entry.due_date,
            entry.amount.to_cents().to_string(),
            entry.principal.to_cents(),
            entry.rent.to_cents(),
        );
    }

    Ok(())
}
