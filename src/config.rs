use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Argon2 iteration count (t_cost) applied when hashing new passwords.
    /// Verification reads the parameters embedded in the stored hash instead.
    pub hash_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(5000),
            database_url,
            jwt,
            hash_cost: parse_hash_cost(std::env::var("HASH_COST").ok())?,
        })
    }
}

/// Argon2 rejects a zero iteration count, so a bad `HASH_COST` must fail at
/// startup rather than on every registration.
fn parse_hash_cost(raw: Option<String>) -> anyhow::Result<u32> {
    match raw {
        Some(v) => {
            let cost: u32 = v
                .parse()
                .context("HASH_COST must be a positive integer")?;
            anyhow::ensure!(cost >= 1, "HASH_COST must be at least 1");
            Ok(cost)
        }
        None => Ok(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_cost_defaults_when_unset() {
        assert_eq!(parse_hash_cost(None).unwrap(), 2);
    }

    #[test]
    fn hash_cost_accepts_positive_values() {
        assert_eq!(parse_hash_cost(Some("3".into())).unwrap(), 3);
    }

    #[test]
    fn hash_cost_rejects_zero() {
        assert!(parse_hash_cost(Some("0".into())).is_err());
    }

    #[test]
    fn hash_cost_rejects_garbage() {
        assert!(parse_hash_cost(Some("fast".into())).is_err());
    }
}
