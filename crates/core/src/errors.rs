use thiserror::Error;

/// 网络属性服务错误类型定义
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("读取文件失败: {path} - {message}")]
    FileRead { path: String, message: String },

    #[error("解析文件失败: {path} - {message}")]
    FileParse { path: String, message: String },

    #[error("属性文件格式错误 (第 {line} 行): {message}")]
    MalformedProperties { line: usize, message: String },

    #[error("缺少配置段: [{section}]")]
    MissingSection { section: String },

    #[error("缺少配置项: [{section}] {key}")]
    MissingProperty { section: String, key: String },

    #[error("无效的数值 '{value}': {message}")]
    InvalidNumber { value: String, message: String },

    #[error("无效的十六进制数据: {0}")]
    InvalidHex(String),

    #[error("数值溢出: {0}")]
    Overflow(String),

    #[error("通胀计划为空")]
    EmptySchedule,

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 统一的Result类型
pub type NetworkResult<T> = Result<T, NetworkError>;

impl NetworkError {
    pub fn missing_section<S: Into<String>>(section: S) -> Self {
        Self::MissingSection {
            section: section.into(),
        }
    }

    pub fn missing_property<S: Into<String>, K: Into<String>>(section: S, key: K) -> Self {
        Self::MissingProperty {
            section: section.into(),
            key: key.into(),
        }
    }

    pub fn invalid_number<V: Into<String>, M: ToString>(value: V, message: M) -> Self {
        Self::InvalidNumber {
            value: value.into(),
            message: message.to_string(),
        }
    }

    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// 文件读取、解析与派生计算失败，对外统一呈现为参数错误
    pub fn is_file_related(&self) -> bool {
        !matches!(
            self,
            NetworkError::Database(_) | NetworkError::Configuration(_) | NetworkError::Internal(_)
        )
    }
}

impl From<anyhow::Error> for NetworkError {
    fn from(err: anyhow::Error) -> Self {
        NetworkError::Internal(err.to_string())
    }
}
