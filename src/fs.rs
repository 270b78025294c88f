//! File writes behind a trait so commands can be tested without touching disk.

use std::io;
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub fn default_fs() -> &'static RealFs {
    static INSTANCE: RealFs = RealFs;
    &INSTANCE
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::RwLock;

    /// In-memory filesystem for command tests.
    #[derive(Debug, Default)]
    pub struct MockFs {
        files: RwLock<HashMap<PathBuf, String>>,
    }

    impl MockFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn read(&self, path: &Path) -> Option<String> {
            self.files.read().unwrap().get(path).cloned()
        }
    }

    impl FileSystem for MockFs {
        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            self.files
                .write()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.read().unwrap().contains_key(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_fs_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out/graph.html");

        default_fs().write(&target, "<html></html>").unwrap();

        assert!(default_fs().exists(&target));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "<html></html>");
    }
}
