pub mod calendar;
pub mod clock;
pub mod errors;
pub mod order;
pub mod ports;
pub mod region;
pub mod validation;
