use std::env;

/// Runtime configuration for the portal service
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Maximum upload size in bytes (default: 25 MB)
    pub max_file_size: usize,

    /// Pause before each analysis progress tick, in milliseconds (default: 200)
    pub processing_tick_ms: u64,

    /// Progress increment per tick (default: 10)
    pub processing_step: u8,

    /// Analyzer backend: "simulated" (default)
    pub analyzer_type: String,

    /// JWT secret key (required in production)
    pub jwt_secret: String,

    /// Issued-token lifetime in hours (default: 24)
    pub token_ttl_hours: i64,

    /// Directory for staged upload bytes
    pub storage_dir: String,

    /// Seed demo users/claims/allotments on startup (default: true)
    pub seed_demo_data: bool,

    /// Allowed CORS origins (comma separated)
    pub allowed_origins: Vec<String>,

    /// Listen port (default: 3000)
    pub port: u16,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            max_file_size: 25 * 1024 * 1024, // 25 MB
            processing_tick_ms: 200,
            processing_step: 10,
            analyzer_type: "simulated".to_string(),
            jwt_secret: "secret".to_string(),
            token_ttl_hours: 24,
            storage_dir: "./data/staging".to_string(),
            seed_demo_data: true,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:3000".to_string(),
            ],
            port: 3000,
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            processing_tick_ms: env::var("PROCESSING_TICK_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.processing_tick_ms),

            processing_step: env::var("PROCESSING_STEP")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|s: &u8| *s > 0 && *s <= 100)
                .unwrap_or(default.processing_step),

            analyzer_type: env::var("ANALYZER_TYPE").unwrap_or(default.analyzer_type),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string()), // Fallback for dev convenience

            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.token_ttl_hours),

            storage_dir: env::var("STORAGE_DIR").unwrap_or(default.storage_dir),

            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.seed_demo_data),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }

    /// Development preset: fast analysis ticks so the upload flow can be
    /// demonstrated without the full 2.2 s wait.
    pub fn development() -> Self {
        Self {
            processing_tick_ms: 50,
            ..Self::default()
        }
    }

    /// Config for tests: millisecond analysis ticks so pipeline tests
    /// finish quickly, staging under a caller-provided directory.
    pub fn for_tests(storage_dir: &str) -> Self {
        Self {
            processing_tick_ms: 1,
            storage_dir: storage_dir.to_string(),
            ..Self::default()
        }
    }
}
