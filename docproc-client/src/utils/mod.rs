pub mod timestamp;

/// Human-readable size, e.g. `2.5 MB`. `None` renders as `Unknown`.
pub fn format_file_size(bytes: Option<u64>) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    match bytes {
        None => "Unknown".to_string(),
        Some(b) if (b as f64) < KB => format!("{} B", b),
        Some(b) if (b as f64) < MB => format!("{:.1} KB", b as f64 / KB),
        Some(b) => format!("{:.1} MB", b as f64 / MB),
    }
}
