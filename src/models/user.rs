use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub age: u8,
    pub roles: BTreeSet<String>,
}

impl User {
    pub fn new(id: &str, username: &str, name: &str, age: u8, roles: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
            name: name.to_string(),
            age,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn role_list(&self) -> Vec<String> {
        self.roles.iter().cloned().collect()
    }
}
