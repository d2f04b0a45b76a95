pub mod earning_session;
pub mod health;
pub mod rates;
pub mod salary_configuration;
