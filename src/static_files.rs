use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Reads whole static assets from a base directory. The default base is the
/// working directory, matching how the server has always been deployed next
/// to its assets.
pub struct StaticFiles {
    base_dir: PathBuf,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base_dir: base.into(),
        }
    }

    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }

    /// Read the named file in full. Missing, unreadable, or traversal paths
    /// all surface as `NotFound`-style errors the router maps to 404.
    pub fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        let path = self
            .map_path(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        fs::read(&path)
    }
}

impl Default for StaticFiles {
    fn default() -> Self {
        Self::new(".")
    }
}
