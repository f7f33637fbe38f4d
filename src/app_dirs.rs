use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typedojo";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("records.db"))
    }

    pub fn log_dir() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("logs"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_share_state_dir() {
        if let (Some(db), Some(logs)) = (AppDirs::db_path(), AppDirs::log_dir()) {
            assert_eq!(db.parent(), logs.parent());
            assert!(db.ends_with("records.db"));
        }
    }

    #[test]
    fn config_path_is_json() {
        if let Some(path) = AppDirs::config_path() {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
        }
    }
}
