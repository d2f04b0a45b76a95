pub mod earning_session;
pub mod error;
pub mod health;
pub mod salary_configuration;
