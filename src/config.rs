//! 환경 변수 기반 설정
//!
//! | 변수 | 기본값 |
//! |---|---|
//! | `BIND_ADDR` | `0.0.0.0:3000` |
//! | `STORE_BACKEND` | `postgres` (`postgres` \| `memory`) |
//! | `DATABASE_URL` | postgres 사용 시 필수 |
//! | `DB_MAX_CONNECTIONS` | `5` |
//! | `RESET_DATABASE` | `false` |

use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store_backend: StoreBackend,
    pub max_connections: u32,
    pub reset_database: bool,
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정 읽기
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 읽기
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_backend = match get("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    value: other.to_string(),
                    reason: "expected 'postgres' or 'memory'",
                })
            }
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => match u32::from_str(raw.trim()) {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: "expected a positive integer",
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let reset_database = match get("RESET_DATABASE") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                key: "RESET_DATABASE",
                value: raw.clone(),
                reason: "expected true/false",
            })?,
            None => false,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            store_backend,
            max_connections,
            reset_database,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
