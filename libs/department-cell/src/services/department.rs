use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use auth_cell::AuthProvider;
use shared_database::{Query, StoreError, SupabaseClient};

use crate::models::{Department, DepartmentError, Doctor};

const DEPARTMENTS: &str = "departments";

/// Read access to the `departments` collection.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn list_all(&self, auth_token: &str) -> Result<Vec<Department>, StoreError>;

    async fn find_by_id(&self, department_id: &str, auth_token: &str)
        -> Result<Option<Department>, StoreError>;
}

pub struct StoreDepartmentRepository {
    supabase: Arc<SupabaseClient>,
}

impl StoreDepartmentRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl DepartmentRepository for StoreDepartmentRepository {
    async fn list_all(&self, auth_token: &str) -> Result<Vec<Department>, StoreError> {
        let query = Query::collection(DEPARTMENTS).order_asc("name");
        self.supabase.select(&query, auth_token).await
    }

    async fn find_by_id(&self, department_id: &str, auth_token: &str)
        -> Result<Option<Department>, StoreError> {
        let query = Query::collection(DEPARTMENTS).eq("id", department_id).limit(1);
        let mut rows: Vec<Department> = self.supabase.select(&query, auth_token).await?;
        Ok(rows.pop())
    }
}

pub struct DepartmentService {
    repository: Arc<dyn DepartmentRepository>,
    auth: Arc<dyn AuthProvider>,
}

impl DepartmentService {
    pub fn new(repository: Arc<dyn DepartmentRepository>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { repository, auth }
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, DepartmentError> {
        let token = self.access_token().await?;

        debug!("Listing departments");
        let departments = match self.repository.list_all(&token).await {
            Ok(departments) => departments,
            Err(e) => return Err(self.map_store_error(e).await),
        };

        Ok(departments
            .into_iter()
            .map(|mut dept| {
                dept.doctors = dept.normalized_doctors();
                dept
            })
            .collect())
    }

    /// Doctors embedded in one department. Unknown departments have none.
    pub async fn get_doctors_by_department(&self, department_id: &str)
        -> Result<Vec<Doctor>, DepartmentError> {
        let token = self.access_token().await?;

        debug!("Fetching doctors for department {}", department_id);
        match self.repository.find_by_id(department_id, &token).await {
            Ok(Some(department)) => Ok(department.normalized_doctors()),
            Ok(None) => {
                debug!("Department {} not found", department_id);
                Ok(Vec::new())
            }
            Err(StoreError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(self.map_store_error(e).await),
        }
    }

    async fn access_token(&self) -> Result<String, DepartmentError> {
        self.auth
            .ensure_authenticated()
            .await
            .map(|session| session.access_token)
            .map_err(|e| DepartmentError::AuthenticationRequired(e.to_string()))
    }

    async fn map_store_error(&self, err: StoreError) -> DepartmentError {
        warn!("Department store error: {}", err);
        if err.is_auth() {
            self.auth.invalidate().await;
            DepartmentError::AuthenticationRequired(err.to_string())
        } else {
            DepartmentError::QueryFailed(err.to_string())
        }
    }
}
