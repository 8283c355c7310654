use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "public/images/kentik-new";

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub base_dir: PathBuf,
}

impl OutputPaths {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn entry_dir(&self, slug: &str) -> PathBuf {
        self.base_dir.join(slug)
    }

    pub fn image_path(&self, slug: &str, filename: &str) -> PathBuf {
        self.entry_dir(slug).join(filename)
    }

    pub fn ensure_base_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.base_dir)
    }

    /// `IMAGE_HARVEST_OUTPUT_DIR` if set, otherwise the default layout
    /// relative to the working directory.
    pub fn from_env() -> Self {
        if let Ok(v) = std::env::var("IMAGE_HARVEST_OUTPUT_DIR") {
            let t = v.trim();
            if !t.is_empty() {
                return Self::new(PathBuf::from(t));
            }
        }
        Self::new(Path::new(DEFAULT_OUTPUT_DIR).to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_layout_is_slug_folder() {
        let paths = OutputPaths::new(PathBuf::from("/out"));
        assert_eq!(
            paths.image_path("npm", "npm_0_a.png"),
            PathBuf::from("/out/npm/npm_0_a.png")
        );
    }

    #[test]
    fn ensure_dirs_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = OutputPaths::new(dir.path().join("images"));
        paths.ensure_base_dir().expect("first");
        paths.ensure_base_dir().expect("again");
        assert!(paths.base_dir.is_dir());
    }
}
