use dotenv::dotenv;

pub struct Config {
    pub bind: String,
    pub port: u16,
    pub data_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        Ok(Config {
            bind: std::env::var("API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            // Set DATA_SEED for reproducible mock data, e.g. in demos.
            data_seed: std::env::var("DATA_SEED").ok().and_then(|s| s.parse().ok()),
        })
    }
}
