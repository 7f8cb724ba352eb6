use std::fs;
use std::path::Path;

use tracing::warn;

/// Normalises the `--context` value into the text handed to the model.
///
/// An empty value resolves to no context. A value naming an existing `.md`
/// or `.txt` file resolves to that file's content; an unreadable or blank
/// file degrades to no context with a warning on the error stream. Any other
/// non-empty value is taken as literal text, unchanged. Never fails.
pub fn resolve_context(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let path = Path::new(raw);
    let readable_suffix = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("md") | Some("txt")
    );
    if path.is_file() && readable_suffix {
        return match fs::read_to_string(path) {
            Ok(content) if !content.trim().is_empty() => content,
            Ok(_) => {
                warn!(path = %path.display(), "Context file is blank, continuing without context");
                eprintln!(
                    "Warning: context file {} is blank, continuing without it",
                    path.display()
                );
                String::new()
            }
            Err(e) => {
                warn!(error = ?e, path = %path.display(), "Failed to read context file, continuing without context");
                eprintln!(
                    "Warning: could not read context file {}: {e}",
                    path.display()
                );
                String::new()
            }
        };
    }

    raw.to_string()
}
