/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Format a duration in seconds as `m:ss` or `h:mm:ss`
pub fn format_duration(seconds: Option<u64>) -> String {
    match seconds {
        None | Some(0) => "Unknown duration".to_string(),
        Some(secs) => {
            let hours = secs / 3600;
            let minutes = (secs % 3600) / 60;
            let rest = secs % 60;

            if hours > 0 {
                format!("{}:{:02}:{:02}", hours, minutes, rest)
            } else {
                format!("{}:{:02}", minutes, rest)
            }
        }
    }
}

/// Format a byte count as megabytes with one decimal
pub fn format_file_size(bytes: u64) -> String {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    format!("{:.1} MB", mb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("test/file.mp4"), "test_file.mp4");
        assert_eq!(sanitize_filename("normal-name.mp4"), "normal-name.mp4");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "Unknown duration");
        assert_eq!(format_duration(Some(0)), "Unknown duration");
        assert_eq!(format_duration(Some(125)), "2:05");
        assert_eq!(format_duration(Some(3725)), "1:02:05");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(1048576), "1.0 MB");
        assert_eq!(format_file_size(1572864), "1.5 MB");
    }
}
