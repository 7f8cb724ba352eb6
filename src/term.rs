use std::io::Write;
use std::path::Path;

/// Picks the unicode marker or its ASCII fallback for `--plain` output.
pub fn mark<'a>(symbol: &'a str, fallback: &'a str, plain: bool) -> &'a str {
    if plain {
        fallback
    } else {
        symbol
    }
}

/// Prints a saved Markdown document back to the terminal.
pub fn view_markdown(path: &Path, out: &mut impl Write) -> std::io::Result<()> {
    let text = std::fs::read_to_string(path)?;
    writeln!(out, "\n{text}")
}
