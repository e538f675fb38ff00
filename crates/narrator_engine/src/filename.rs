use std::path::Path;

/// Base name of a submitted document: the file name with exactly the final
/// dot-extension removed (`notes.txt` -> `notes`, `a.b.txt` -> `a.b`).
/// Names without an extension and dotfiles are returned unchanged.
pub fn base_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

/// Default output base name for an input path. Falls back to `output` when
/// the path carries no usable file name, matching what the synthesis
/// service assumes for an absent name.
pub fn base_name_for_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");
    base_name(file_name)
}
