use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub room_id: i64,
    pub room_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            room_id: env::var("RAUM_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            room_name: env::var("RAUM_NAME").unwrap_or_default(),
        }
    }
}
