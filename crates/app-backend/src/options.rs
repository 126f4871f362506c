use std::{ffi::OsString, path::PathBuf};

/// Everything a single engine invocation is told besides the query.
///
/// Built fresh for every request and never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub format: Option<String>,
    pub player_client: Option<String>,
    pub remote_components: Vec<String>,
    pub playlist_items: Option<String>,
    /// 1-based, inclusive
    pub playlist_start: Option<u64>,
    /// 1-based, inclusive
    pub playlist_end: Option<u64>,
    pub flat_playlist: bool,
    pub no_playlist: bool,
    pub download: Option<DownloadTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// yt-dlp output template, eg. `content/media/video/1700000000000.%(ext)s`
    pub output_template: PathBuf,
}

impl ExtractionOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_format<T: Into<String>>(mut self, format: T) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_player_client<T: Into<String>>(mut self, client: T) -> Self {
        self.player_client = Some(client.into());
        self
    }

    #[must_use]
    pub fn with_remote_components<I, T>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.remote_components = components.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_playlist_items<T: Into<String>>(mut self, items: T) -> Self {
        self.playlist_items = Some(items.into());
        self
    }

    #[must_use]
    pub const fn with_playlist_bounds(mut self, start: u64, end: u64) -> Self {
        self.playlist_start = Some(start);
        self.playlist_end = Some(end);
        self
    }

    #[must_use]
    pub const fn flat(mut self) -> Self {
        self.flat_playlist = true;
        self
    }

    #[must_use]
    pub const fn single(mut self) -> Self {
        self.no_playlist = true;
        self
    }

    #[must_use]
    pub fn downloading_to<T: Into<PathBuf>>(mut self, output_template: T) -> Self {
        self.download = Some(DownloadTarget {
            output_template: output_template.into(),
        });
        self
    }

    /// Command line arguments for yt-dlp, not including the query itself
    #[must_use]
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--ignore-config".into(),
            "--no-color".into(),
            "--no-progress".into(),
            "--dump-single-json".into(),
        ];

        match &self.download {
            Some(target) => {
                args.push("--no-simulate".into());
                args.push("--no-part".into());
                args.push("--no-mtime".into());
                args.push("--output".into());
                args.push(target.output_template.clone().into_os_string());
            }
            None => {
                args.push("--simulate".into());
            }
        }

        if let Some(format) = &self.format {
            args.push("--format".into());
            args.push(format.into());
        }

        if let Some(client) = &self.player_client {
            args.push("--extractor-args".into());
            args.push(format!("youtube:player_client={client}").into());
        }

        for component in &self.remote_components {
            args.push("--remote-components".into());
            args.push(component.into());
        }

        if let Some(items) = &self.playlist_items {
            args.push("--playlist-items".into());
            args.push(items.into());
        }

        if let Some(start) = self.playlist_start {
            args.push("--playlist-start".into());
            args.push(start.to_string().into());
        }

        if let Some(end) = self.playlist_end {
            args.push("--playlist-end".into());
            args.push(end.to_string().into());
        }

        if self.flat_playlist {
            args.push("--flat-playlist".into());
        }

        if self.no_playlist {
            args.push("--no-playlist".into());
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(options: &ExtractionOptions) -> Vec<String> {
        options
            .to_args()
            .into_iter()
            .map(|x| x.to_string_lossy().into_owned())
            .collect()
    }

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn metadata_only_by_default() {
        let args = args_of(&ExtractionOptions::new());

        assert!(args.contains(&"--dump-single-json".to_string()));
        assert!(args.contains(&"--simulate".to_string()));
        assert!(!args.contains(&"--no-simulate".to_string()));
    }

    #[test]
    fn single_video_options() {
        let options = ExtractionOptions::new()
            .with_playlist_items("1")
            .single()
            .with_player_client("web_safari")
            .with_remote_components(["ejs:github"]);
        let args = args_of(&options);

        assert!(has_pair(&args, "--playlist-items", "1"));
        assert!(has_pair(
            &args,
            "--extractor-args",
            "youtube:player_client=web_safari"
        ));
        assert!(has_pair(&args, "--remote-components", "ejs:github"));
        assert!(args.contains(&"--no-playlist".to_string()));
    }

    #[test]
    fn playlist_bounds_and_flat_listing() {
        let args = args_of(&ExtractionOptions::new().flat().with_playlist_bounds(4, 10));

        assert!(has_pair(&args, "--playlist-start", "4"));
        assert!(has_pair(&args, "--playlist-end", "10"));
        assert!(args.contains(&"--flat-playlist".to_string()));
    }

    #[test]
    fn download_target_disables_simulation() {
        let options = ExtractionOptions::new()
            .with_format("best")
            .downloading_to("content/media/video/1.%(ext)s");
        let args = args_of(&options);

        assert!(args.contains(&"--no-simulate".to_string()));
        assert!(!args.contains(&"--simulate".to_string()));
        assert!(has_pair(&args, "--output", "content/media/video/1.%(ext)s"));
        assert!(has_pair(&args, "--format", "best"));
    }
}
