use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_ASSETS_DIR: &str = "public";
pub const DEFAULT_BOUNDARY_FILE: &str = "Odisha.json";
pub const DEFAULT_DIST_DIR: &str = "dist";

pub const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
pub const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";
pub const CACHE_NONE: &str = "no-cache";

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn port() -> u16 {
    non_empty("PORT")
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PORT)
}

pub fn bind_addr() -> String {
    non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
}

pub fn assets_dir() -> PathBuf {
    PathBuf::from(non_empty("ASSETS_DIR").unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string()))
}

/// File name of the boundary document inside [`assets_dir`].
pub fn boundary_file() -> String {
    non_empty("BOUNDARY_FILE").unwrap_or_else(|| DEFAULT_BOUNDARY_FILE.to_string())
}

/// Optional values file; the built-in sample table is served without it.
pub fn mapdata_file() -> Option<PathBuf> {
    non_empty("MAPDATA_FILE").map(PathBuf::from)
}

pub fn dist_dir() -> PathBuf {
    PathBuf::from(non_empty("DIST_DIR").unwrap_or_else(|| DEFAULT_DIST_DIR.to_string()))
}
