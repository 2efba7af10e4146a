use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;

use crate::error::AppError;

const DEFAULT_WORKBOOK: &str = "data/divorcios.xlsx";
const DEFAULT_OUT_DIR: &str = "eda-out";
const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the divorce statistics workbook.
    pub workbook_path: PathBuf,
    /// Directory receiving charts, CSV exports and the JSON summary.
    pub out_dir: PathBuf,
    /// Row cap for the occupation frequency table and chart.
    pub top_n: usize,
}

pub fn load_config() -> Result<Config, AppError> {
    Config::from_env()
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env first so the variables below can come from it.
        dotenv().ok();

        let workbook_path = env::var("DIVORCE_EDA_WORKBOOK")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WORKBOOK));

        let out_dir = env::var("DIVORCE_EDA_OUT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUT_DIR));

        let top_n = match env::var("DIVORCE_EDA_TOP_N") {
            Ok(raw) => raw.parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| {
                AppError::Config(format!(
                    "DIVORCE_EDA_TOP_N must be a positive integer, got {raw:?}"
                ))
            })?,
            Err(_) => DEFAULT_TOP_N,
        };

        Ok(Config {
            workbook_path,
            out_dir,
            top_n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        // Single test so the env mutations cannot race each other.
        env::remove_var("DIVORCE_EDA_WORKBOOK");
        env::remove_var("DIVORCE_EDA_OUT");
        env::remove_var("DIVORCE_EDA_TOP_N");

        let config = Config::from_env().unwrap();
        assert_eq!(config.workbook_path, PathBuf::from(DEFAULT_WORKBOOK));
        assert_eq!(config.out_dir, PathBuf::from(DEFAULT_OUT_DIR));
        assert_eq!(config.top_n, DEFAULT_TOP_N);

        env::set_var("DIVORCE_EDA_TOP_N", "25");
        assert_eq!(Config::from_env().unwrap().top_n, 25);

        env::set_var("DIVORCE_EDA_TOP_N", "zero");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));

        env::set_var("DIVORCE_EDA_TOP_N", "0");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));

        env::remove_var("DIVORCE_EDA_TOP_N");
    }
}
