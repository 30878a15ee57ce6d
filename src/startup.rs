use crate::configuration::Settings;
use crate::estimator::Artifacts;
use crate::routes::auth::{login_page, login_post, logout_handler, signup_page, signup_post};
use crate::routes::health::health_check;
use crate::routes::home::{home, predict};
use crate::services::auth::AuthService;
use crate::services::prediction::PredictionService;
use crate::services::session::SessionKeys;
use crate::store::user::UserRepository;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use axum::{
    Router,
    routing::{get, post},
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth_service: AuthService,
    pub prediction_service: PredictionService,
    pub sessions: SessionKeys,
}

impl AppState {
    /// Wire services from settings. Fails if the model artifacts cannot be loaded.
    pub fn build(cfg: &Settings) -> anyhow::Result<Self> {
        let artifacts = Artifacts::load(&cfg.model.scaler_path, &cfg.model.regressor_path)?;
        let prediction_service = PredictionService::new(artifacts);

        let user_repo = UserRepository::new(cfg.storage.users_file.clone());
        let auth_service = AuthService::new(user_repo);

        let sessions = SessionKeys::new(&cfg.session.secret, cfg.session.ttl_hours)?;

        Ok(Self {
            auth_service,
            prediction_service,
            sessions,
        })
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .route("/login", get(login_page).post(login_post))
        .route("/signup", get(signup_page).post(signup_post))
        .route("/logout", get(logout_handler))
        .route("/health_check", get(health_check))
        .nest_service("/assets", ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(cfg: Settings) -> anyhow::Result<()> {
    let app_state = AppState::build(&cfg)?;
    let app = router(app_state);

    let address = cfg.application.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Listening on {}", address);
    axum::serve(listener, app).await?;
    Ok(())
}
