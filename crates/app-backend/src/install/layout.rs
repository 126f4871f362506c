use std::path::{Path, PathBuf};

use crate::yt_dlp::VenvEnvironment;

/// Where things live inside of a virtual environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvLayout {
    root: PathBuf,
}

impl VenvLayout {
    #[must_use]
    pub fn new<T: Into<PathBuf>>(root: T) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.root.join("Scripts")
        } else {
            self.root.join("bin")
        }
    }

    #[must_use]
    pub fn python(&self) -> PathBuf {
        self.bin_dir().join(executable_name("python"))
    }

    /// The entry point pip generates for the `yt-dlp` console script
    #[must_use]
    pub fn yt_dlp(&self) -> PathBuf {
        self.bin_dir().join(executable_name("yt-dlp"))
    }

    #[must_use]
    pub fn environment(&self) -> VenvEnvironment {
        VenvEnvironment {
            virtual_env: self.root.clone(),
            bin_dir: self.bin_dir(),
        }
    }
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn unix_layout() {
        let layout = VenvLayout::new("/opt/gateway/gen-1");

        assert_eq!(layout.python(), PathBuf::from("/opt/gateway/gen-1/bin/python"));
        assert_eq!(layout.yt_dlp(), PathBuf::from("/opt/gateway/gen-1/bin/yt-dlp"));
        assert_eq!(
            layout.environment(),
            VenvEnvironment {
                virtual_env: PathBuf::from("/opt/gateway/gen-1"),
                bin_dir: PathBuf::from("/opt/gateway/gen-1/bin"),
            }
        );
    }
}
