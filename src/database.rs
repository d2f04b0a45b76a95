pub mod earning_session;
pub mod in_memory;
pub mod postgres_repository;
pub mod salary_configuration;

use crate::database::earning_session::EarningSessionRepository;
use crate::database::salary_configuration::SalaryConfigurationRepository;

/// Everything the earnings service needs from persistence.
///
/// Implemented by [`in_memory::InMemoryRepository`] and
/// [`postgres_repository::PostgresRepository`]; handlers only see
/// `Arc<dyn EarningsStore>` from managed state.
pub trait EarningsStore: SalaryConfigurationRepository + EarningSessionRepository {
    fn backend_name(&self) -> &'static str;
}
