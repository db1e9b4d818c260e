//! Archive path constants and the path rewriter.

pub const PROJECT_PROPERTIES_FILE_NAME: &str = "youngandroidproject/project.properties";
pub const REMIX_INFORMATION_FILE_PATH: &str = "youngandroidproject/remix_history";
pub const ANDROID_KEYSTORE_FILENAME: &str = "android.keystore";
pub const SRC_FOLDER: &str = "src/";

/// Last path segment. A path without `/` is its own basename.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Everything before the last `/`, or the empty string for a bare name.
pub fn dirname(path: &str) -> &str {
    path.rfind('/').map(|idx| &path[..idx]).unwrap_or("")
}

pub fn is_source_path(path: &str) -> bool {
    path.starts_with(SRC_FOLDER)
}

/// Map an archive path into the destination namespace.
///
/// Anything under `src/` is flattened into `source_directory`: only the leaf
/// name survives, so `src/a/b/Foo.scm` and `src/c/Foo.scm` collide. Every
/// other path passes through unchanged.
pub fn rewrite(original_path: &str, source_directory: &str) -> String {
    if is_source_path(original_path) {
        format!("{}/{}", source_directory, basename(original_path))
    } else {
        original_path.to_string()
    }
}
