pub mod cli;
pub mod common;
pub mod file;
pub mod timeframe;
pub mod validators;

use std::{env, path::PathBuf};

use clap::Parser;
use cli::CliArgs;
use common::DumpConfigType;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use validator::Validate;

static CONFIG: Lazy<Config> = Lazy::new(Config::new);

pub static APPLICATION_NAME: &str = "extraction-gateway";
pub static ORGANIZATION_NAME: &str = "allypost";
pub static ORGANIZATION_QUALIFIER: &str = "net";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[serde(skip)]
    #[validate(nested)]
    pub run: common::RunConfig,

    /// Where and whether the HTTP listener is started
    #[validate(nested)]
    pub server: common::ServerConfig,

    /// How the extraction backend is installed and kept up to date
    #[validate(nested)]
    pub backend: common::BackendConfig,

    /// Options passed along to every extraction
    #[validate(nested)]
    pub extraction: common::ExtractionConfig,

    /// Listener settings after merging the config file with the command line
    #[serde(skip_deserializing)]
    pub listen: file::ListenSettings,
}
impl Config {
    #[must_use]
    #[inline]
    pub fn global() -> &'static Self {
        &CONFIG
    }

    #[must_use]
    #[inline]
    pub fn cache_dir() -> PathBuf {
        Self::get_project_dir().map_or_else(
            || env::temp_dir().join(APPLICATION_NAME),
            |x| x.cache_dir().into(),
        )
    }

    pub fn dump_config_if_needed<T>(data: &T, dump_type: &Option<Option<DumpConfigType>>)
    where
        T: Serialize + ?Sized,
    {
        match dump_type {
            Some(dump_type) => {
                let out = match dump_type {
                    None | Some(DumpConfigType::Json) => serde_json::to_string_pretty(data)
                        .expect("Failed to serialize config to JSON"),

                    Some(DumpConfigType::Toml) => {
                        toml::to_string_pretty(data).expect("Failed to serialize config to TOML")
                    }
                };

                println!("{}", out.trim());
                std::process::exit(0);
            }
            None => (),
        }
    }

    #[inline]
    pub fn validate_config_and_exit<T: Validate>(conf: T) -> T {
        if let Err(e) = conf.validate() {
            eprintln!("Errors validating configuration:");
            print_validation_errors(&e, "  ", 1);
            std::process::exit(1);
        }

        conf
    }

    fn new() -> Self {
        let args = CliArgs::parse();

        Self::default()
            .merge_with_cli(args)
            .resolve_paths()
            .load_listen_settings()
            .validate_self()
            .dump_if_needed()
    }

    fn merge_with_cli(mut self, args: CliArgs) -> Self {
        self.run = args.run;
        self.server = args.server;
        self.backend = args.backend;
        self.extraction = args.extraction;

        self
    }

    fn resolve_paths(mut self) -> Self {
        self.backend = self.backend.resolve_paths();

        self
    }

    fn load_listen_settings(mut self) -> Self {
        let from_file = match &self.server.config_path {
            Some(path) => match file::GatewayFileConfig::load(path) {
                Ok(conf) => conf.listen_settings(),
                Err(e) => {
                    eprintln!("Failed to load config file {path:?}: {e:?}");
                    std::process::exit(1);
                }
            },
            None => file::ListenSettings::default(),
        };

        self.listen = from_file.with_overrides(self.server.host.clone(), self.server.port);

        self
    }

    fn dump_if_needed(self) -> Self {
        Self::dump_config_if_needed(&self, &self.run.dump_config);
        self
    }

    #[inline]
    fn validate_self(self) -> Self {
        Self::validate_config_and_exit(self)
    }

    #[inline]
    fn get_project_dir() -> Option<ProjectDirs> {
        ProjectDirs::from(ORGANIZATION_QUALIFIER, ORGANIZATION_NAME, APPLICATION_NAME)
    }
}

pub fn print_validation_errors(e: &validator::ValidationErrors, prefix: &str, level: usize) {
    let level = level.max(1);
    for (e_name, e) in e.errors() {
        match e {
            validator::ValidationErrorsKind::Field(e) => {
                let prefix_rep = prefix.repeat(level);
                eprintln!(
                    "{prefix_rep}{e_name}:\n{}",
                    e.iter()
                        .map(|x| format!("{} {:?}", x.code, x.params))
                        .fold(String::new(), |acc, a| format!(
                            "{acc}{prefix_rep}{prefix}- {a}\n"
                        ))
                        .trim_end()
                );
            }

            validator::ValidationErrorsKind::Struct(e) => {
                eprintln!("{}{}:", prefix, e_name);
                print_validation_errors(e, prefix, level + 1);
            }

            validator::ValidationErrorsKind::List(e) => {
                eprintln!("{}{}:", prefix, e_name);
                for e in e.values() {
                    print_validation_errors(e, prefix, level + 1);
                }
            }
        }
    }
}
