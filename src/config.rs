use std::env;
use std::path::PathBuf;

#[derive(Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub profile: String,
}

impl Config {
    pub fn from_env() -> Self {
        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());

        let data_dir = env::var("LIBRARIA_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                if profile == "default" {
                    PathBuf::from("data")
                } else {
                    PathBuf::from(format!("data_{}", profile))
                }
            });

        Self { data_dir, profile }
    }
}
