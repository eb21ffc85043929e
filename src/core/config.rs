use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub google_oauth: GoogleOAuthConfig,
    pub storage: StorageConfig,
    pub media: MediaConfig,
    pub vendors: VendorConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Local JWT issuance and verification settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry: Duration,
}

/// Google OAuth2 authorization-code exchange settings
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub userinfo_url: String,
    /// Redirect URI registered with Google; "postmessage" for the SPA popup flow
    pub redirect_uri: String,
}

/// Local-disk storage configuration for uploaded media
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory where uploads are stored and served from
    pub uploads_dir: PathBuf,
    /// Maximum size per uploaded file in bytes
    pub max_file_size: usize,
    /// Maximum number of files accepted per upload request
    pub max_files_per_upload: usize,
}

/// External media toolkit (ffmpeg/ffprobe) paths
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
}

/// API keys and endpoints for the external AI vendors.
///
/// All keys are optional; the provider fallback chains are assembled from
/// whichever keys are present at startup.
#[derive(Debug, Clone, Default)]
pub struct VendorConfig {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub assembly_ai_api_key: Option<String>,
    pub assembly_ai_base_url: String,
    pub google_cloud_api_key: Option<String>,
    pub caption_service_url: Option<String>,
    pub ninjas_api_key: Option<String>,
    pub ninjas_api_url: String,
    pub fal_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            google_oauth: GoogleOAuthConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            media: MediaConfig::from_env()?,
            vendors: VendorConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 7 * 24 * 3600; // 7 days

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET_KEY")
            .map_err(|_| "JWT_SECRET_KEY environment variable is required".to_string())?;

        if jwt_secret.len() < 32 {
            return Err("JWT_SECRET_KEY must be at least 32 characters".to_string());
        }

        let token_expiry_secs = env::var("JWT_EXPIRY_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TOKEN_EXPIRY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_EXPIRY_SECS must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            token_expiry: Duration::from_secs(token_expiry_secs),
        })
    }
}

impl GoogleOAuthConfig {
    pub fn from_env() -> Result<Self, String> {
        let client_id = env::var("GOOGLE_CLIENT_ID").unwrap_or_default();
        let client_secret = env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default();

        let token_url = env::var("GOOGLE_TOKEN_URI")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string());

        let userinfo_url = env::var("GOOGLE_USERINFO_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v3/userinfo".to_string());

        // "postmessage" is the sentinel redirect for the SPA popup code flow
        let redirect_uri =
            env::var("GOOGLE_REDIRECT_URI").unwrap_or_else(|_| "postmessage".to_string());

        Ok(Self {
            client_id,
            client_secret,
            token_url,
            userinfo_url,
            redirect_uri,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl StorageConfig {
    const DEFAULT_MAX_FILE_SIZE: usize = 100 * 1024 * 1024; // 100MB
    const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 10;

    pub fn from_env() -> Result<Self, String> {
        let uploads_dir =
            PathBuf::from(env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()));

        let max_file_size = env::var("MAX_FILE_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_FILE_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_FILE_SIZE must be a valid number".to_string())?;

        let max_files_per_upload = env::var("MAX_FILES_PER_UPLOAD")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_FILES_PER_UPLOAD.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_FILES_PER_UPLOAD must be a valid number".to_string())?;

        Ok(Self {
            uploads_dir,
            max_file_size,
            max_files_per_upload,
        })
    }
}

impl MediaConfig {
    pub fn from_env() -> Result<Self, String> {
        let ffmpeg_path = env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string());
        let ffprobe_path = env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string());

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }
}

impl VendorConfig {
    pub fn from_env() -> Result<Self, String> {
        let non_empty = |key: &str| env::var(key).ok().filter(|s| !s.is_empty());

        let assembly_ai_base_url = env::var("ASSEMBLY_AI_BASE_URL")
            .unwrap_or_else(|_| "https://api.assemblyai.com/v2".to_string());

        let ninjas_api_url = env::var("NINJAS_IMAGE_CONVERT_URL")
            .unwrap_or_else(|_| "https://api.api-ninjas.com/v1/imagetotext".to_string());

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            gemini_api_key: non_empty("GOOGLE_GEMINI_API_KEY"),
            assembly_ai_api_key: non_empty("ASSEMBLY_AI_API_KEY"),
            assembly_ai_base_url,
            google_cloud_api_key: non_empty("GOOGLE_CLOUD_API_KEY"),
            caption_service_url: non_empty("CAPTION_SERVICE_URL"),
            ninjas_api_key: non_empty("NINJAS_IMAGE_CONVERT_KEY"),
            ninjas_api_url,
            fal_api_key: non_empty("FAL_KEY"),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "StoryAI API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for StoryAI".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
