/// early settlement - quote a discounted payoff and print it as JSON
use lease_finance_rs::chrono::NaiveDate;
use lease_finance_rs::{
    DiscountType, Money, PlanRequest, Rate, SafeTimeProvider, SettlementDiscountCalculator,
    SettlementDiscountSettings, TieredDiscount, TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let plan = PlanRequest::dynamic_rent(
        Money::from_major(50_000),
        Money::from_major(10_000),
        "3 Years",
        Rate::from_decimal(dec!(0.12)),
        start,
    )
    .build(&time)?;

    // deeper discounts the earlier the payoff
    let settings = SettlementDiscountSettings {
        tiered_discounts: vec![
            TieredDiscount {
                min_months_early: dec!(12),
                max_months_early: None,
                principal_discount: dec!(3),
                interest_discount: dec!(50),
                principal_discount_type: DiscountType::Percentage,
                interest_discount_type: DiscountType::Percentage,
            },
            TieredDiscount {
                min_months_early: dec!(1),
                max_months_early: Some(dec!(12)),
                principal_discount: dec!(1),
                interest_discount: dec!(25),
                principal_discount_type: DiscountType::Percentage,
                interest_discount_type: DiscountType::Percentage,
            },
        ],
        max_discount_percentage: Some(dec!(10)),
        ..Default::default()
    };

    let settle_on = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let quote = SettlementDiscountCalculator::new(&plan, &settings).quote(
        &plan.remaining_entries(),
        Some(settle_on),
        &time,
    )?;

    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}
