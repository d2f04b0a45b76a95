pub mod earnings;
pub mod rates;
pub mod settlement;
