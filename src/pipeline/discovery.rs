use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List Python files directly inside a directory, excluding module-init
/// files. A missing directory yields an empty list, not an error.
///
/// The listing is deliberately not sorted: enumeration order is whatever the
/// filesystem yields, and schema consumers must not rely on item order.
pub fn python_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("py")
            && entry.file_name() != "__init__.py"
        {
            files.push(path.to_path_buf());
        }
    }

    files
}

/// List subdirectories of a directory, skipping bytecode caches
pub fn subdirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() && entry.file_name() != "__pycache__" {
            dirs.push(entry.path().to_path_buf());
        }
    }

    dirs
}

/// File name without its extension
pub fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_python_files_excludes_init_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("camera.py"), "").unwrap();
        fs::write(dir.path().join("__init__.py"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/deep.py"), "").unwrap();

        let files = python_files(dir.path());
        let names: Vec<&str> = files.iter().map(|p| file_stem(p)).collect();
        assert_eq!(names, vec!["camera"]);
    }

    #[test]
    fn test_missing_directory_yields_empty_list() {
        assert!(python_files(Path::new("/nonexistent/plugins")).is_empty());
        assert!(subdirs(Path::new("/nonexistent/actions")).is_empty());
    }

    #[test]
    fn test_subdirs_skips_pycache() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("speak")).unwrap();
        fs::create_dir(dir.path().join("__pycache__")).unwrap();
        fs::write(dir.path().join("loose.py"), "").unwrap();

        let dirs = subdirs(dir.path());
        assert_eq!(dirs.len(), 1);
        assert!(dirs[0].ends_with("speak"));
    }
}
