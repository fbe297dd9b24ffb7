pub mod domain;
pub mod policies;
pub mod ports;
pub mod use_cases;
