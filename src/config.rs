use std::env;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET is not set, falling back to the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };
        let jwt_expiry_hours = parse_expiry_hours(env::var("JWT_EXPIRY_HOURS").ok().as_deref())?;
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            jwt_expiry_hours,
        })
    }
}

/// Token lifetime in hours: 24 when unset, otherwise 1 to 8760.
fn parse_expiry_hours(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_JWT_EXPIRY_HOURS);
    };
    let hours: i64 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("JWT_EXPIRY_HOURS must be a whole number, got {raw:?}"))?;
    if !(1..=MAX_JWT_EXPIRY_HOURS).contains(&hours) {
        anyhow::bail!("JWT_EXPIRY_HOURS must be between 1 and {MAX_JWT_EXPIRY_HOURS}, got {hours}");
    }
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_defaults_to_a_day() {
        assert_eq!(parse_expiry_hours(None).unwrap(), 24);
        assert_eq!(parse_expiry_hours(Some("  ")).unwrap(), 24);
        assert_eq!(parse_expiry_hours(Some("72")).unwrap(), 72);
    }

    #[test]
    fn out_of_range_expiry_is_rejected() {
        assert!(parse_expiry_hours(Some("0")).is_err());
        assert!(parse_expiry_hours(Some("abc")).is_err());
        assert!(parse_expiry_hours(Some("9223372036854775807")).is_err());
        assert!(parse_expiry_hours(Some("8761")).is_err());
    }
}
