use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::salary_configuration::{SalaryConfiguration, SalaryConfigurationRequest, SalaryConfigurationUpdateRequest};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait SalaryConfigurationRepository: Send + Sync {
    async fn create_configuration(&self, request: &SalaryConfigurationRequest) -> Result<SalaryConfiguration, AppError>;
    async fn get_configuration_by_id(&self, id: &Uuid) -> Result<Option<SalaryConfiguration>, AppError>;
    /// Applies the present fields and refreshes `updated_at`. `None` when the id is unknown.
    async fn update_configuration(&self, id: &Uuid, update: &SalaryConfigurationUpdateRequest) -> Result<Option<SalaryConfiguration>, AppError>;
}

#[async_trait::async_trait]
impl SalaryConfigurationRepository for PostgresRepository {
    async fn create_configuration(&self, request: &SalaryConfigurationRequest) -> Result<SalaryConfiguration, AppError> {
        let configuration = sqlx::query_as::<_, SalaryConfiguration>(
            r#"
            INSERT INTO salary_configuration (monthly_salary, daily_hours, weekly_days, is_holiday)
            VALUES ($1, $2, $3, COALESCE($4, FALSE))
            RETURNING id, monthly_salary, daily_hours, weekly_days, is_holiday, created_at, updated_at
            "#,
        )
        .bind(request.monthly_salary)
        .bind(request.daily_hours)
        .bind(request.weekly_days)
        .bind(request.is_holiday)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to create salary configuration", e))?;

        Ok(configuration)
    }

    async fn get_configuration_by_id(&self, id: &Uuid) -> Result<Option<SalaryConfiguration>, AppError> {
        let configuration = sqlx::query_as::<_, SalaryConfiguration>(
            r#"
            SELECT id, monthly_salary, daily_hours, weekly_days, is_holiday, created_at, updated_at
            FROM salary_configuration
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to fetch salary configuration", e))?;

        Ok(configuration)
    }

    async fn update_configuration(&self, id: &Uuid, update: &SalaryConfigurationUpdateRequest) -> Result<Option<SalaryConfiguration>, AppError> {
        let configuration = sqlx::query_as::<_, SalaryConfiguration>(
            r#"
            UPDATE salary_configuration
            SET monthly_salary = COALESCE($2, monthly_salary),
                daily_hours = COALESCE($3, daily_hours),
                weekly_days = COALESCE($4, weekly_days),
                is_holiday = COALESCE($5, is_holiday),
                updated_at = now()
            WHERE id = $1
            RETURNING id, monthly_salary, daily_hours, weekly_days, is_holiday, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.monthly_salary)
        .bind(update.daily_hours)
        .bind(update.weekly_days)
        .bind(update.is_holiday)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to update salary configuration", e))?;

        Ok(configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{postgres_repository, sample_request};

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_create_and_fetch_configuration() {
        let repo = postgres_repository().await;

        let created = repo.create_configuration(&sample_request()).await.unwrap();
        let fetched = repo.get_configuration_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.monthly_salary, 5000.0);
        assert!(!fetched.is_holiday);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_partial_update_keeps_other_fields() {
        let repo = postgres_repository().await;
        let created = repo.create_configuration(&sample_request()).await.unwrap();

        let update = SalaryConfigurationUpdateRequest {
            daily_hours: Some(6.0),
            ..Default::default()
        };
        let updated = repo.update_configuration(&created.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.daily_hours, 6.0);
        assert_eq!(updated.monthly_salary, created.monthly_salary);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_update_unknown_configuration_returns_none() {
        let repo = postgres_repository().await;
        let result = repo.update_configuration(&Uuid::new_v4(), &SalaryConfigurationUpdateRequest::default()).await.unwrap();
        assert!(result.is_none());
    }
}
