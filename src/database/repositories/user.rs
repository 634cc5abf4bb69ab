use crate::lifecycle::Startable;
use crate::models::User;

/// 用户存储库，内存实现，启动后只读
pub struct UserRepository {
    users: Vec<User>,
}

impl Default for UserRepository {
    fn default() -> Self {
        Self::with_users(vec![
            User::new("1", "admin", "Admin", 30, &["admin", "user"]),
            User::new("2", "ben", "Ben", 18, &["user"]),
            User::new("3", "lan", "Lan", 25, &["user"]),
        ])
    }
}

impl UserRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn all(&self) -> &[User] {
        &self.users
    }
}

impl Startable for UserRepository {
    fn name(&self) -> &'static str {
        "UserRepository"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups() {
        let repo = UserRepository::default();
        assert_eq!(repo.find_by_id("2").map(|u| u.username.as_str()), Some("ben"));
        assert_eq!(repo.find_by_username("admin").map(|u| u.id.as_str()), Some("1"));
        assert!(repo.find_by_id("404").is_none());
        assert_eq!(repo.all().len(), 3);
    }
}
