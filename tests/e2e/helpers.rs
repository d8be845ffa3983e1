use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub struct TestProject {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestProject {
    /// A scratch directory whose config points at the offline catalog fixture.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_cdx-license-resolver").to_string();

        let project = Self { dir, binary_path };
        project.write_config(&format!(
            "catalog_file = {:?}\n",
            fixture("licenses.json").display().to_string()
        ));
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.path().join("cdx-license-resolver.toml"), content)
            .expect("Failed to write config");
    }

    pub fn append_config(&self, content: &str) {
        let path = self.path().join("cdx-license-resolver.toml");
        let existing = fs::read_to_string(&path).unwrap_or_default();
        fs::write(&path, format!("{}{}", existing, content)).expect("Failed to write config");
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run cdx-license-resolver")
    }
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
