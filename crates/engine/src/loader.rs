use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use foundation::bounds::BoundingSphere;
use formats::TilesetDocument;
use tracing::debug;

use crate::error::LoadError;
use crate::primitives::{Tileset, TilesetOptions};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Asynchronous tileset source.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait TilesetLoader {
    fn load_tileset(
        &self,
        url: &str,
        options: TilesetOptions,
    ) -> BoxFuture<'_, Result<Tileset, LoadError>>;
}

/// Builds a tileset from a parsed `tileset.json`.
pub fn tileset_from_document(
    url: &str,
    document: &TilesetDocument,
    options: TilesetOptions,
) -> Result<Tileset, LoadError> {
    let sphere = document.bounding_sphere().map_err(|source| LoadError::Tileset {
        url: url.to_string(),
        source,
    })?;
    let mut tileset = Tileset::new(url, sphere, options);
    tileset.properties = document.properties.clone();
    Ok(tileset)
}

/// Resolves tileset URLs against a local asset root.
///
/// `/campus/tileset.json` and `campus/tileset.json` both map to `<root>/campus/tileset.json`.
#[derive(Debug, Clone)]
pub struct FileTilesetLoader {
    root: PathBuf,
}

impl FileTilesetLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, url: &str) -> Result<PathBuf, LoadError> {
        let relative = url.trim_start_matches('/');
        if relative.is_empty() || relative.contains("://") {
            return Err(LoadError::InvalidUrl(url.to_string()));
        }
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(LoadError::InvalidUrl(url.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl TilesetLoader for FileTilesetLoader {
    fn load_tileset(
        &self,
        url: &str,
        options: TilesetOptions,
    ) -> BoxFuture<'_, Result<Tileset, LoadError>> {
        let url = url.to_string();
        let path = self.resolve(&url);

        Box::pin(async move {
            let path = path?;
            debug!(url = %url, path = %path.display(), "reading tileset");
            let payload = match std::fs::read_to_string(&path) {
                Ok(payload) => payload,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(LoadError::NotFound(url));
                }
                Err(source) => return Err(LoadError::Io { url, source }),
            };
            let document = TilesetDocument::from_json(&payload)
                .map_err(|source| LoadError::Tileset {
                    url: url.clone(),
                    source,
                })?;
            tileset_from_document(&url, &document, options)
        })
    }
}

/// In-memory tileset source keyed by URL.
#[derive(Debug, Default)]
pub struct MemoryTilesetLoader {
    spheres: Mutex<BTreeMap<String, BoundingSphere>>,
    loads: AtomicUsize,
}

impl MemoryTilesetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: impl Into<String>, sphere: BoundingSphere) {
        if let Ok(mut spheres) = self.spheres.lock() {
            spheres.insert(url.into(), sphere);
        }
    }

    pub fn with_tileset(self, url: impl Into<String>, sphere: BoundingSphere) -> Self {
        self.insert(url, sphere);
        self
    }

    pub fn remove(&self, url: &str) {
        if let Ok(mut spheres) = self.spheres.lock() {
            spheres.remove(url);
        }
    }

    /// Number of load requests served so far, failed ones included.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl TilesetLoader for MemoryTilesetLoader {
    fn load_tileset(
        &self,
        url: &str,
        options: TilesetOptions,
    ) -> BoxFuture<'_, Result<Tileset, LoadError>> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        let url = url.to_string();
        let sphere = self
            .spheres
            .lock()
            .ok()
            .and_then(|spheres| spheres.get(&url).copied());

        Box::pin(async move {
            match sphere {
                Some(sphere) => Ok(Tileset::new(url, sphere, options)),
                None => Err(LoadError::NotFound(url)),
            }
        })
    }
}
