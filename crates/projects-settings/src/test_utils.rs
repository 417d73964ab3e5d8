use crate::store::fs_backend::FsBackend;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub backend: FsBackend,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let backend = FsBackend::new(&root);
        Self {
            _temp_dir: temp_dir,
            backend,
            root,
        }
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join("data.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StorageBackend;
    use serde_json::json;

    #[test]
    fn env_backend_points_into_temp_dir() {
        let env = TestEnv::new();
        assert_eq!(env.backend.location(), env.data_file());

        env.backend.save(&json!({ "version": 2 })).unwrap();
        assert!(env.data_file().exists());
    }
}
