use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub admin: AdminBootstrapConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64, // seconds
}

/// 启动时确保存在的默认管理员
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminBootstrapConfig {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Default for AdminBootstrapConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "Admin12345".to_string(),
            email: Some("admin@herballuckydraw.com".to_string()),
        }
    }
}

/// 上传文件相关配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// 表格暂存目录（处理完成后即删除）
    pub excel_dir: String,
    /// 奖品图片目录
    pub images_dir: String,
    pub max_excel_bytes: usize,
    pub max_image_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            excel_dir: "uploads/excel".to_string(),
            images_dir: "images".to_string(),
            max_excel_bytes: 10 * 1024 * 1024,
            max_image_bytes: 2 * 1024 * 1024,
        }
    }
}

/// 导入 / 列表相关配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 后台上传入口缺省状态
    pub admin_default_status: String,
    /// JSON API 上传入口缺省状态
    pub api_default_status: String,
    /// 后台页面展示的最大错误条数，超过则只显示计数
    pub max_listed_errors: usize,
    pub admin_page_size: u64,
    pub api_page_size: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            admin_default_status: "Active".to_string(),
            api_default_status: "Pending".to_string(),
            max_listed_errors: 10,
            admin_page_size: 20,
            api_page_size: 10,
        }
    }
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .with_context(|| format!("failed to parse config file {config_path}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    anyhow!("DATABASE_URL is not set and no config file was found at {config_path}")
                })?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 3000u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 86_400i64),
                    },
                    admin: AdminBootstrapConfig::default(),
                    uploads: UploadConfig::default(),
                    import: ImportConfig::default(),
                }
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read config file {config_path}"));
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("ADMIN_USERNAME") {
            config.admin.username = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            config.admin.password = v;
        }
        if let Ok(v) = env::var("UPLOAD_EXCEL_DIR") {
            config.uploads.excel_dir = v;
        }
        if let Ok(v) = env::var("UPLOAD_IMAGES_DIR") {
            config.uploads.images_dir = v;
        }
        if let Ok(v) = env::var("IMPORT_ADMIN_DEFAULT_STATUS") {
            config.import.admin_default_status = v;
        }
        if let Ok(v) = env::var("IMPORT_API_DEFAULT_STATUS") {
            config.import.api_default_status = v;
        }

        Ok(config)
    }
}
