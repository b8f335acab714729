use std::rc::Rc;

use crate::api::types::{ApiError, CreateUserRequest, Role, UpdateUserRequest, UserProfile};
use crate::api::ApiClient;

#[derive(Clone)]
pub struct UsersRepository {
    client: Rc<ApiClient>,
}

impl UsersRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Rc::new(api),
        }
    }

    pub async fn list(&self, role: Option<Role>) -> Result<Vec<UserProfile>, ApiError> {
        self.client.list_users(role).await
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<UserProfile, ApiError> {
        self.client.create_user(&request).await
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserProfile, ApiError> {
        self.client.update_user(id, &request).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete_user(id).await
    }
}
