use std::sync::Arc;

use config::Config;
use database::UserRepository;
use i18n::Translator;
use infrastructure::auth::JwtManager;
use lifecycle::Startable;
use services::{AuthenticationService, UserService};

pub mod config;
pub mod database;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod lifecycle;
pub mod middleware;
pub mod models;
pub mod result;
pub mod router;
pub mod routes;
pub mod services;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translator: Arc<Translator>,
    pub jwt: Arc<JwtManager>,
    pub users: Arc<UserService>,
    pub auth: Arc<AuthenticationService>,
}

impl AppState {
    pub fn new(config: Config, translator: Translator, jwt: JwtManager) -> Self {
        let jwt = Arc::new(jwt);
        let repo = Arc::new(UserRepository::default());
        let users = Arc::new(UserService::new(repo));
        let auth = Arc::new(AuthenticationService::new(users.clone(), jwt.clone()));

        Self {
            config: Arc::new(config),
            translator: Arc::new(translator),
            jwt,
            users,
            auth,
        }
    }

    /// 需要生命周期管理的组件，按依赖顺序排列
    pub fn components(&self) -> Vec<Arc<dyn Startable>> {
        vec![
            self.jwt.clone() as Arc<dyn Startable>,
            self.users.repository().clone() as Arc<dyn Startable>,
            self.users.clone() as Arc<dyn Startable>,
            self.auth.clone() as Arc<dyn Startable>,
        ]
    }
}
