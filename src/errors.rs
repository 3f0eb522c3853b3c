use rust_decimal::Decimal;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum LeaseError {
    #[error("payment structure percentages must sum to 100, got {sum}")]
    PaymentStructureSum {
        sum: Decimal,
    },

    #[error("payment structure contains negative {component} percentage: {value}")]
    NegativePercentage {
        component: &'static str,
        value: Decimal,
    },

    #[error("invalid vehicle price: {price}")]
    InvalidVehiclePrice {
        price: Money,
    },

    #[error("down payment {down_payment} exceeds vehicle price {price}")]
    DownPaymentExceedsPrice {
        down_payment: Money,
        price: Money,
    },

    #[error("invalid rental rate: {rate}")]
    InvalidRentalRate {
        rate: Decimal,
    },

    #[error("invalid term: {months} months")]
    InvalidTerm {
        months: u32,
    },

    #[error("invalid discount settings: {message}")]
    InvalidDiscountSettings {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LeaseError>;
