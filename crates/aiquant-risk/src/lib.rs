//! Risk validation for position opens.

mod validator;

pub use validator::{RiskConfig, RiskValidator};
