use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use outage_shared::document::BoundaryDocument;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const DEFAULT_REGION: &str = "Odisha";
const DEFAULT_ADMIN_LEVEL: u8 = 4;
/// Admin level of the area that bounds the search (a state).
const REGION_AREA_LEVEL: u8 = 4;
const DEFAULT_OUT: &str = "public/export.json";
/// Server-side timeout placed in the query itself, in seconds.
const QUERY_TIMEOUT_SECS: u64 = 250;

const USAGE: &str = "Usage: boundary-fetch [--region NAME] [--admin-level N] [--out FILE] [--url OVERPASS_URL]\n       boundary-fetch --inspect FILE";

/// Overpass QL selecting the administrative boundary relations at
/// `admin_level` inside the state-level area called `region`, with full
/// geometry.
fn build_query(region: &str, admin_level: u8) -> String {
    let region = region.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n\
         area[name=\"{region}\"][admin_level=\"{REGION_AREA_LEVEL}\"]->.region;\n\
         (\n  rel(area.region)[\"boundary\"=\"administrative\"][\"admin_level\"~\"^({admin_level})$\"];\n);\n\
         out geom;\n"
    )
}

fn parse_admin_level(raw: Option<String>) -> Result<u8> {
    match raw {
        None => Ok(DEFAULT_ADMIN_LEVEL),
        Some(s) => {
            let level: u8 = s
                .trim()
                .parse()
                .with_context(|| format!("invalid --admin-level {s:?}"))?;
            if !(1..=11).contains(&level) {
                bail!("--admin-level must be between 1 and 11, got {level}");
            }
            Ok(level)
        }
    }
}

fn fetch(url: &str, query: &str) -> Result<serde_json::Value> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(QUERY_TIMEOUT_SECS + 30))
        .build()
        .context("failed to build HTTP client")?;
    info!(%url, "querying Overpass");
    let resp = client
        .get(url)
        .query(&[("data", query)])
        .send()
        .with_context(|| format!("request to {url} failed"))?;
    let status = resp.status();
    if !status.is_success() {
        bail!("Overpass returned HTTP {status}");
    }
    resp.json().context("Overpass response is not JSON")
}

/// Write pretty-printed JSON, creating the parent directory if needed.
fn save(path: &Path, value: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

fn element_count(value: &serde_json::Value) -> usize {
    value
        .get("elements")
        .and_then(|e| e.as_array())
        .map_or(0, |e| e.len())
}

/// Human-readable overview of a boundary document.
fn summarize(doc: &BoundaryDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Collections: {}\nFeatures: {}\n",
        doc.collections().len(),
        doc.feature_count()
    ));
    match doc.bounds() {
        Some(b) => out.push_str(&format!(
            "Bounds: lon {:.4} .. {:.4}, lat {:.4} .. {:.4}\n",
            b.min_lon, b.max_lon, b.min_lat, b.max_lat
        )),
        None => out.push_str("Bounds: none\n"),
    }
    for collection in doc.collections() {
        out.push_str(&format!(
            "\n=== {} ({} features) ===\n",
            collection.name,
            collection.features.len()
        ));
        for feature in &collection.features {
            let name = feature.display_name();
            out.push_str(&format!(
                "  {}  {}\n",
                feature.id,
                name.as_deref().unwrap_or("(unnamed)")
            ));
        }
    }
    out
}

fn inspect(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let doc = BoundaryDocument::from_json_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    print!("{}", summarize(&doc));
    Ok(())
}

fn get_arg(flag: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != flag).nth(1)
}

fn has_flag(flag: &str) -> bool {
    std::env::args().any(|a| a == flag)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if has_flag("--help") || has_flag("-h") {
        eprintln!("{USAGE}");
        return Ok(());
    }

    if has_flag("--inspect") {
        let Some(file) = get_arg("--inspect") else {
            bail!("--inspect needs a file\n{USAGE}");
        };
        return inspect(Path::new(&file));
    }

    let region = get_arg("--region").unwrap_or_else(|| DEFAULT_REGION.to_string());
    let admin_level = parse_admin_level(get_arg("--admin-level"))?;
    let out = get_arg("--out").unwrap_or_else(|| DEFAULT_OUT.to_string());
    let url = get_arg("--url").unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_string());

    let query = build_query(&region, admin_level);
    let data = fetch(&url, &query)?;
    let elements = element_count(&data);
    if elements == 0 {
        warn!(%region, admin_level, "Overpass returned no boundary relations");
    }
    save(Path::new(&out), &data)?;
    info!(%out, elements, "saved boundary data");
    Ok(())
}
