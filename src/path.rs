use std::path::{Path, PathBuf};

/// Render an output or config path for messages.
///
/// Relative paths, as typed on the command line, are shown unchanged. Absolute
/// paths under the home directory are shortened to `~/...`.
pub fn format_path_for_display(path: &Path) -> String {
    match path.is_absolute().then(|| shorten_home(path)).flatten() {
        Some(shortened) => shortened.display().to_string(),
        None => path.display().to_string(),
    }
}

fn shorten_home(path: &Path) -> Option<PathBuf> {
    let rest = path.strip_prefix(home::home_dir()?).ok()?;
    if rest.as_os_str().is_empty() {
        Some(PathBuf::from("~"))
    } else {
        Some(Path::new("~").join(rest))
    }
}

/// Derive a build name from an input path: its file name, minus `suffix`.
///
/// Falls back to the whole path when there's no file name component, and keeps
/// the file name intact when stripping would leave nothing.
pub fn build_name(path: &Path, suffix: Option<&str>) -> String {
    let Some(file_name) = path.file_name() else {
        return path.display().to_string();
    };
    let file_name = file_name.to_string_lossy();

    match suffix.and_then(|s| file_name.strip_suffix(s)) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name.into_owned(),
    }
}
