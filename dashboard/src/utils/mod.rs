pub mod currency;
pub mod time;
