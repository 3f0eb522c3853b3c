pub mod decimal;
pub mod errors;
pub mod ownership;
pub mod plan;
pub mod schedule;
pub mod settlement;
pub mod tenure;
pub mod types;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{LeaseError, Result};
pub use ownership::{
    Milestone, MilestoneLabel, OwnershipCalculator, OwnershipSplit, OwnershipTimeline,
    OwnershipTimelineBuilder,
};
pub use plan::{InstallmentPlan, PlanRequest};
pub use schedule::{
    aggregate_monthly, AmortizedScheduleGenerator, BalloonScheduleGenerator, GeneratedSchedule,
    MonthlyRollup, PaymentScheduleEntry, PaymentScheduleGenerator,
};
pub use settlement::{
    DiscountType, SettlementDiscountCalculator, SettlementDiscountSettings,
    SettlementEligibility, SettlementQuote, TierOverlapWarning, TieredDiscount,
};
pub use tenure::parse_tenure;
pub use types::{
    ActualStatus, CalculationMethod, PaymentInterval, PaymentStructure, PaymentType, PlanId,
    ProjectedStatus,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
