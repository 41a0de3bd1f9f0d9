use std::{sync::Arc, time::Duration};

use validator::Validate;

use crate::{
    db::with_timeout,
    errors::{AppError, AppResult},
    models::{
        domain::{User, UserRole},
        dto::{
            request::{CreateUserRequest, UpdateAvatarImageRequest},
            response::{GemsUpdatedResponse, UserDto},
        },
        ids::parse_object_id,
    },
    repositories::UserRepository,
};

const SEARCH_LIMIT: i64 = 10;

#[derive(Debug)]
pub enum CreateUserOutcome {
    Created(UserDto),
    AlreadyExists,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    timeout: Duration,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    /// Registers a user unless the email is already known. New accounts
    /// always start with the `user` role.
    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<CreateUserOutcome> {
        request.validate()?;

        let existing = with_timeout(self.timeout, self.repository.find_by_email(&request.email)).await?;
        if existing.is_some() {
            return Ok(CreateUserOutcome::AlreadyExists);
        }

        let user = User::new(&request.email, request.name, request.img);
        match with_timeout(self.timeout, self.repository.create(user)).await {
            Ok(user) => Ok(CreateUserOutcome::Created(user.into())),
            // Lost a race with a concurrent signup for the same email.
            Err(AppError::AlreadyExists(_)) => Ok(CreateUserOutcome::AlreadyExists),
            Err(err) => Err(err),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        with_timeout(self.timeout, self.repository.find_by_email(email)).await
    }

    pub async fn list_users(&self, email: Option<&str>) -> AppResult<Vec<UserDto>> {
        let users = with_timeout(self.timeout, self.repository.list(email)).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    /// Case-insensitive substring search on email. The term is matched
    /// literally, never as a pattern.
    pub async fn search_users(&self, term: &str) -> AppResult<Vec<UserDto>> {
        let pattern = regex::escape(term.trim());
        let users = with_timeout(
            self.timeout,
            self.repository.search_by_email(&pattern, SEARCH_LIMIT),
        )
        .await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn set_role(&self, id: &str, role: UserRole) -> AppResult<UserDto> {
        let id = parse_object_id(id, "id")?;
        let user = with_timeout(self.timeout, self.repository.set_role(&id, role))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;

        log::info!("User {} now has role '{}'", user.email, role.as_str());
        Ok(user.into())
    }

    pub async fn add_gems(&self, email: &str, gems: i64) -> AppResult<GemsUpdatedResponse> {
        let matched = with_timeout(self.timeout, self.repository.increment_gems(email, gems)).await?;
        if !matched {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(GemsUpdatedResponse {
            success: true,
            email: email.to_string(),
            gems,
        })
    }

    pub async fn set_avatar_image(
        &self,
        email: &str,
        request: UpdateAvatarImageRequest,
    ) -> AppResult<UserDto> {
        request.validate()?;

        let user = with_timeout(self.timeout, self.repository.set_image(email, &request.img))
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }
}
