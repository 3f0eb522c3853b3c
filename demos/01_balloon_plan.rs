/// balloon plan - 20/60/20 split with ownership milestones
use lease_finance_rs::chrono::NaiveDate;
use lease_finance_rs::{
    Money, OwnershipTimelineBuilder, PaymentStructure, PlanRequest, Rate, SafeTimeProvider,
    TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let plan = PlanRequest::balloon(
        Money::from_major(50_000),
        PaymentStructure::new(dec!(20), dec!(60), dec!(20)),
        "1 Year",
        Rate::from_decimal(dec!(0.12)),
        start,
    )
    .build(&time)?;

    println!("down payment:  {}", plan.down_payment);
    println!("balloon:       {}", plan.balloon_payment.unwrap_or(Money::ZERO));
    println!("total payable: {}", plan.total_amount);

    let timeline = OwnershipTimelineBuilder::build(&plan);
    println!(
        "progress: {}% ({}/{} payments)",
        timeline.progress_percentage, timeline.completed_payments, timeline.total_payments
    );
    for milestone in &timeline.milestones {
        println!(
            "  {:?} at period {} ({}%)",
            milestone.label, milestone.period, milestone.ownership_percentage
        );
    }

    Ok(())
}
