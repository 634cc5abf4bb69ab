use std::sync::Arc;

use crate::database::UserRepository;
use crate::error::{AppError, ERRORS};
use crate::lifecycle::Startable;
use crate::models::User;

pub struct UserService {
    repo: Arc<UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<UserRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Arc<UserRepository> {
        &self.repo
    }

    /// 返回问候语的 message key
    pub fn greeting(&self) -> &'static str {
        "hello"
    }

    pub fn find_by_id(&self, id: &str) -> Result<User, AppError> {
        self.repo
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| ERRORS.not_found.user.into())
    }

    pub fn find_by_username(&self, username: &str) -> Result<User, AppError> {
        self.repo
            .find_by_username(username)
            .cloned()
            .ok_or_else(|| ERRORS.not_found.user.into())
    }

    pub fn all(&self) -> Vec<User> {
        self.repo.all().to_vec()
    }
}

impl Startable for UserService {
    fn name(&self) -> &'static str {
        "UserService"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_user_is_not_found() {
        let service = UserService::new(Arc::new(UserRepository::default()));
        assert_eq!(service.find_by_id("2").unwrap().name, "Ben");
        let err = service.find_by_id("404").unwrap_err();
        assert!(matches!(err, AppError::Sub(e) if e == ERRORS.not_found.user));
    }
}
