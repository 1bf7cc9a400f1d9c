use user_shared::api::{CreateUserRequest, UpdateUserRequest};
use user_shared::User;
use uuid::Uuid;

use crate::db::StoreHandle;
use crate::error::AppError;

const REQUIRED_FIELDS: &str = "name and email required";

/// Domain operations over the user store.
#[derive(Clone)]
pub struct UserRepository {
    store: StoreHandle,
}

/// Trims both fields and rejects either being empty.
fn required_fields(name: &str, email: &str) -> Result<(String, String), AppError> {
    let (name, email) = (name.trim(), email.trim());
    if name.is_empty() || email.is_empty() {
        return Err(AppError::Validation(REQUIRED_FIELDS.to_string()));
    }
    Ok((name.to_string(), email.to_string()))
}

/// Ids that are not UUIDs cannot address any record.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound)
}

impl UserRepository {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.store.store()?.list().await?)
    }

    pub async fn get(&self, id: &str) -> Result<User, AppError> {
        let id = parse_id(id)?;
        self.store.store()?.find(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<User, AppError> {
        let (name, email) = required_fields(&req.name, &req.email)?;
        let user = self.store.store()?.insert(&name, &email).await?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    pub async fn update(&self, id: &str, req: UpdateUserRequest) -> Result<User, AppError> {
        let id = parse_id(id)?;
        let store = self.store.store()?;
        // Unknown ids are reported before the body is looked at.
        store.find(id).await?.ok_or(AppError::NotFound)?;

        let (name, email) = required_fields(&req.name, &req.email)?;
        let user = store
            .update(id, &name, &email)
            .await?
            .ok_or(AppError::NotFound)?;

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = parse_id(id)?;
        if !self.store.store()?.delete(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::db::MemoryUserStore;

    fn repository() -> (UserRepository, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        let repo = UserRepository::new(StoreHandle::connected(store.clone()));
        (repo, store)
    }

    fn create_request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[rstest]
    #[case("", "ann@x.com")]
    #[case("Ann", "")]
    #[case("   ", "ann@x.com")]
    #[case("Ann", "\t")]
    #[tokio::test]
    async fn create_requires_name_and_email(#[case] name: &str, #[case] email: &str) {
        let (repo, store) = repository();

        let err = repo.create(create_request(name, email)).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn create_stores_trimmed_values() {
        let (repo, _) = repository();

        let user = repo.create(create_request("  Ann ", " ann@x.com")).await.unwrap();

        assert_eq!(user.name, "Ann");
        assert_eq!(user.email, "ann@x.com");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (repo, store) = repository();
        repo.create(create_request("Ann", "ann@x.com")).await.unwrap();

        let err = repo.create(create_request("Annie", "ann@x.com")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_revalidates_fields() {
        let (repo, _) = repository();
        let user = repo.create(create_request("Ann", "ann@x.com")).await.unwrap();

        let err = repo
            .update(
                &user.id.to_string(),
                UpdateUserRequest {
                    name: String::new(),
                    email: "ann@x.com".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(repo.get(&user.id.to_string()).await.unwrap().name, "Ann");
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("6f1c2a1e-0000-4000-8000-000000000000")]
    #[tokio::test]
    async fn unknown_ids_are_not_found(#[case] id: &str) {
        let (repo, store) = repository();

        assert!(matches!(repo.get(id).await, Err(AppError::NotFound)));
        assert!(matches!(repo.delete(id).await, Err(AppError::NotFound)));
        let update = repo
            .update(
                id,
                UpdateUserRequest {
                    name: "Ghost".to_string(),
                    email: "ghost@x.com".to_string(),
                },
            )
            .await;
        assert!(matches!(update, Err(AppError::NotFound)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found_before_validation() {
        let (repo, _) = repository();

        let err = repo
            .update(
                "6f1c2a1e-0000-4000-8000-000000000000",
                UpdateUserRequest::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn disconnected_store_is_unavailable() {
        let repo = UserRepository::new(StoreHandle::new());

        assert!(matches!(repo.list().await, Err(AppError::Unavailable)));
        let err = repo.create(create_request("Ann", "ann@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable));
    }
}
