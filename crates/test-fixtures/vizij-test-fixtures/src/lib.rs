use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    tweens: HashMap<String, TweenEntry>,
    #[serde(default)]
    curves: HashMap<String, String>,
}

/// A tween request fixture, optionally paired with a string parameter override.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TweenEntry {
    Path(String),
    Detailed {
        request: String,
        #[serde(default)]
        parameters: Option<String>,
    },
}

impl TweenEntry {
    fn as_path(&self) -> &str {
        match self {
            TweenEntry::Path(path) => path,
            TweenEntry::Detailed { request, .. } => request,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod tweens {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.tweens.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.tweens, "tween", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.tweens, "tween", name)?;
        super::load_json(entry.as_path())
    }

    /// String parameter override listed next to the request, if any.
    pub fn parameters(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.tweens, "tween", name)?;
        Ok(match entry {
            TweenEntry::Path(_) => None,
            TweenEntry::Detailed { parameters, .. } => parameters.clone(),
        })
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.tweens, "tween", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}

pub mod curves {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.curves.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.curves, "curve", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.curves, "curve", name)?;
        super::load_json(rel)
    }
}
