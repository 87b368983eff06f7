use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use futures_util::future::{join_all, BoxFuture};
use serde::Serialize;
use tracing::warn;

use crate::error::SimIssue;
use crate::types::GenerationMode;
use crate::world::{poster_image_key, Area};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssetEntry {
    pub key: String,
    pub path: String,
}

impl AssetEntry {
    fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct AssetManifest {
    pub entries: Vec<AssetEntry>,
}

impl AssetManifest {
    pub fn for_area(area: &Area) -> Self {
        let ambience = match area.mode {
            GenerationMode::Block => AssetEntry::new("ambience_surface", "audio/ambience_surface.ogg"),
            GenerationMode::Corridor => {
                AssetEntry::new("ambience_pocket", "audio/ambience_pocket.ogg")
            }
        };
        let mut manifest = Self::default();
        manifest.push(AssetEntry::new("wall_texture", "textures/wall.png"));
        manifest.push(AssetEntry::new("floor_texture", "textures/floor.png"));
        manifest.push(ambience);
        for poster in &area.posters {
            let key = poster_image_key(poster.image);
            let path = format!("posters/{key}.png");
            manifest.push(AssetEntry::new(key, path));
        }
        manifest
    }

    fn push(&mut self, entry: AssetEntry) {
        if !self.entries.iter().any(|existing| existing.key == entry.key) {
            self.entries.push(entry);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssetHandle {
    pub key: String,
    pub uri: String,
    pub placeholder: bool,
}

/// Resolves one manifest entry to a URI the render collaborator can fetch.
pub trait AssetSource: Send + Sync {
    fn load<'a>(&'a self, entry: &'a AssetEntry) -> BoxFuture<'a, Result<String, String>>;
}

/// Files under a root directory, served under `url_prefix`.
pub struct DirectoryAssetSource {
    root: PathBuf,
    url_prefix: String,
}

impl DirectoryAssetSource {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }
}

impl AssetSource for DirectoryAssetSource {
    fn load<'a>(&'a self, entry: &'a AssetEntry) -> BoxFuture<'a, Result<String, String>> {
        Box::pin(async move {
            let path = self.root.join(&entry.path);
            let meta = tokio::fs::metadata(&path)
                .await
                .map_err(|err| format!("{}: {err}", path.display()))?;
            if !meta.is_file() {
                return Err(format!("{} is not a file", path.display()));
            }
            Ok(format!(
                "{}/{}",
                self.url_prefix.trim_end_matches('/'),
                entry.path
            ))
        })
    }
}

/// In-memory source for headless runs and tests. `None` accepts every key.
pub struct StaticAssetSource {
    available: Option<HashSet<String>>,
}

impl StaticAssetSource {
    pub fn all() -> Self {
        Self { available: None }
    }

    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: Some(keys.into_iter().map(Into::into).collect()),
        }
    }
}

impl AssetSource for StaticAssetSource {
    fn load<'a>(&'a self, entry: &'a AssetEntry) -> BoxFuture<'a, Result<String, String>> {
        Box::pin(async move {
            match &self.available {
                Some(keys) if !keys.contains(&entry.key) => Err("not bundled".to_string()),
                _ => Ok(format!("static://{}", entry.path)),
            }
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadedAssets {
    pub handles: BTreeMap<String, AssetHandle>,
    pub issues: Vec<SimIssue>,
}

impl LoadedAssets {
    pub fn placeholder_count(&self) -> usize {
        self.handles.values().filter(|handle| handle.placeholder).count()
    }
}

/// Loads every entry concurrently. Failures fall back to a placeholder handle
/// and are reported, so the area always becomes ready.
pub async fn load_area_assets(source: &dyn AssetSource, manifest: &AssetManifest) -> LoadedAssets {
    let results = join_all(manifest.entries.iter().map(|entry| source.load(entry))).await;

    let mut loaded = LoadedAssets::default();
    for (entry, result) in manifest.entries.iter().zip(results) {
        let handle = match result {
            Ok(uri) => AssetHandle {
                key: entry.key.clone(),
                uri,
                placeholder: false,
            },
            Err(reason) => {
                let issue = SimIssue::AssetLoadFailed {
                    key: entry.key.clone(),
                    reason,
                };
                warn!("{issue}");
                loaded.issues.push(issue);
                AssetHandle {
                    key: entry.key.clone(),
                    uri: format!("placeholder://{}", entry.key),
                    placeholder: true,
                }
            }
        };
        loaded.handles.insert(entry.key.clone(), handle);
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{generate_area, AreaRequest, GridSize};

    fn pocket() -> Area {
        generate_area(&AreaRequest::new(
            7,
            GridSize::new(30, 30),
            GenerationMode::Corridor,
        ))
        .expect("valid request")
    }

    #[test]
    fn manifest_lists_each_key_once() {
        let area = pocket();
        let manifest = AssetManifest::for_area(&area);
        let keys: HashSet<&str> = manifest.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys.len(), manifest.entries.len());
        assert!(keys.contains("ambience_pocket"));
        assert!(!keys.contains("ambience_surface"));
        for poster in &area.posters {
            assert!(keys.contains(poster_image_key(poster.image).as_str()));
        }
    }

    #[tokio::test]
    async fn missing_assets_become_placeholders() {
        let manifest = AssetManifest::for_area(&pocket());
        let source = StaticAssetSource::with_keys(["wall_texture"]);

        let loaded = load_area_assets(&source, &manifest).await;

        assert_eq!(loaded.handles.len(), manifest.entries.len());
        assert!(!loaded.handles["wall_texture"].placeholder);
        assert!(loaded.handles["floor_texture"].placeholder);
        assert_eq!(loaded.placeholder_count(), manifest.entries.len() - 1);
        assert_eq!(loaded.issues.len(), manifest.entries.len() - 1);
    }

    #[tokio::test]
    async fn directory_source_reports_missing_files() {
        let source = DirectoryAssetSource::new("/definitely/not/a/real/dir", "/assets");
        let manifest = AssetManifest {
            entries: vec![AssetEntry::new("wall_texture", "textures/wall.png")],
        };
        let loaded = load_area_assets(&source, &manifest).await;
        assert_eq!(loaded.placeholder_count(), 1);
        assert!(matches!(
            loaded.issues.as_slice(),
            [SimIssue::AssetLoadFailed { key, .. }] if key == "wall_texture"
        ));
    }
}
