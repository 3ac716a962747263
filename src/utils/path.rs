//! Path helpers for candidate discovery

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension of the containers we process
pub const CONTAINER_EXTENSION: &str = "mkv";

/// True for paths ending in `.mkv`, any case
pub fn is_container(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(CONTAINER_EXTENSION))
        .unwrap_or(false)
}

/// `<file>.temp` next to the source, used as the cleanup mux output
pub fn temp_output_for(source: &Path) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(".temp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_container() {
        assert!(is_container(Path::new("/m/a.mkv")));
        assert!(is_container(Path::new("/m/A.MKV")));
        assert!(!is_container(Path::new("/m/a.mkv.temp")));
        assert!(!is_container(Path::new("/m/a.mp4")));
        assert!(!is_container(Path::new("/m/mkv")));
    }

    #[test]
    fn test_temp_output_for() {
        assert_eq!(
            temp_output_for(Path::new("/m/My Movie.mkv")),
            PathBuf::from("/m/My Movie.mkv.temp")
        );
    }
}
