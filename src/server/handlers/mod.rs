pub mod estimates;
pub mod fares;
pub mod health;
pub mod tariffs;
