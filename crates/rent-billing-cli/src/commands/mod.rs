pub mod billing;
pub mod debt;
pub mod words;
