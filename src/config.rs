// Application configuration, loaded from environment variables and CLI flags.

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL (SQLite connection string).
    pub database_url: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Base URL of the messaging gateway that delivers our outbound calls.
    pub messenger_url: String,
    /// Shared secret the gateway sends in `X-Webhook-Token`. Unset means
    /// the webhook accepts any caller.
    pub webhook_token: Option<String>,
    /// Users allowed to create caches.
    pub admin_ids: Vec<i64>,
    /// Radius in meters at which a hunt counts as arrived.
    pub arrival_radius_meters: f64,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite connection string (default: `sqlite:cachehunt.db?mode=rwc`)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `MESSENGER_URL` - gateway base URL (default: `http://localhost:8081`)
    /// - `WEBHOOK_TOKEN` - shared webhook secret (optional)
    /// - `ADMIN_IDS` - comma-separated admin user ids (`ADMIN_ID` works for a single one)
    /// - `ARRIVAL_RADIUS_METERS` - arrival radius (default: 200)
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:cachehunt.db?mode=rwc".to_string());

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(&args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| std::env::var("PORT").ok().and_then(|v| v.parse().ok()))
            .unwrap_or(3000);

        let messenger_url = std::env::var("MESSENGER_URL")
            .unwrap_or_else(|_| "http://localhost:8081".to_string());

        let webhook_token = std::env::var("WEBHOOK_TOKEN").ok();

        let admin_ids = std::env::var("ADMIN_IDS")
            .or_else(|_| std::env::var("ADMIN_ID"))
            .map(|raw| parse_admin_ids(&raw))
            .unwrap_or_default();

        let arrival_radius_meters = std::env::var("ARRIVAL_RADIUS_METERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(200.0);

        Config {
            database_url,
            port,
            messenger_url,
            webhook_token,
            admin_ids,
            arrival_radius_meters,
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}

/// Parse a comma-separated id list, skipping anything unparseable.
fn parse_admin_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids_list() {
        assert_eq!(parse_admin_ids("1,2,3"), vec![1, 2, 3]);
        assert_eq!(parse_admin_ids(" 10 , 20 "), vec![10, 20]);
    }

    #[test]
    fn test_parse_admin_ids_single() {
        assert_eq!(parse_admin_ids("42"), vec![42]);
    }

    #[test]
    fn test_parse_admin_ids_skips_garbage() {
        assert_eq!(parse_admin_ids("1,abc,3"), vec![1, 3]);
        assert!(parse_admin_ids("").is_empty());
    }

    #[test]
    fn test_is_admin() {
        let config = Config {
            database_url: String::new(),
            port: 0,
            messenger_url: String::new(),
            webhook_token: None,
            admin_ids: vec![100, 200],
            arrival_radius_meters: 200.0,
        };
        assert!(config.is_admin(100));
        assert!(!config.is_admin(300));
    }
}
