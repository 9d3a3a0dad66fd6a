use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// 連線層級失敗 (DNS、連線被拒、逾時等)
    #[error("Client Error: {message}")]
    Client { message: String },

    /// 伺服器回應非 2xx，或回應內容無法解析
    #[error("Server Error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("Aggregation error: {message}")]
    Aggregation { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl CatalogError {
    pub fn client(err: impl std::fmt::Display) -> Self {
        Self::Client {
            message: err.to_string(),
        }
    }

    pub fn server(status: reqwest::StatusCode, message: impl Into<String>) -> Self {
        Self::Server {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// 設定相關錯誤，呼叫端應在載入任何資料前中止
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::TomlParse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
