use std::path::{Path, PathBuf};

/// Files or directories whose presence marks a project root.
pub const PROJECT_MARKERS: &[&str] = &[".git", ".claude", "package.json", "pyproject.toml"];

/// Name of the directory images are saved into, below the project root.
pub const OUTPUT_SUBDIR: &str = "pic";

/// Walks from `start` towards the filesystem root and returns the first
/// directory holding a project marker. Falls back to the filesystem root.
pub fn find_project_root(start: &Path) -> PathBuf {
    let mut root = start;
    for dir in start.ancestors() {
        if PROJECT_MARKERS.iter().any(|marker| dir.join(marker).exists()) {
            log::debug!("Project root found at {}", dir.display());
            return dir.to_path_buf();
        }
        root = dir;
    }

    log::debug!(
        "No project marker above {}, using {}",
        start.display(),
        root.display()
    );
    root.to_path_buf()
}

pub fn default_output_dir(start: &Path) -> PathBuf {
    find_project_root(start).join(OUTPUT_SUBDIR)
}
