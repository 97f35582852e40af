pub mod check;
pub mod present;
