use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use serde::Deserialize;
use strum::{IntoEnumIterator, VariantNames};
use structopt::StructOpt;
use tracing::warn;

use crate::bugs::{self, KnownBug};
use crate::request::DEFAULT_BASE_URL;

#[derive(Debug)]
pub struct Config {
    pub base_url: String,
    pub output_csv: Option<PathBuf>,
    pub filter: Option<String>,
    pub list: bool,

    // Known bugs reported as regressions instead of expected failures
    pub fixed_bugs: HashSet<KnownBug>,
}

lazy_static! {
    pub static ref CONFIG: Config = Config::new();
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_csv: None,
            filter: None,
            list: false,
            fixed_bugs: HashSet::new(),
        }
    }
}

impl Config {
    fn new() -> Self {
        let opt = Opt::from_args();

        let file: ConfigFile = match get_file_config(&opt.config_file) {
            Ok(config) => config,
            Err(e) => {
                // only worth mentioning when the user pointed at a file
                if opt.config_file.is_some() {
                    warn!("Error opening config file: {}", e);
                }
                ConfigFile::default()
            }
        };

        Config::from_parts(opt, file)
    }

    pub(crate) fn from_parts(opt: Opt, file: ConfigFile) -> Self {
        let mut config = Config::default();

        config.base_url = if let Some(base_url) = opt.base_url {
            base_url
        } else if let Some(base_url) = file.base_url {
            base_url
        } else {
            DEFAULT_BASE_URL.to_string()
        };

        config.output_csv = opt.output_csv;
        config.filter = opt.filter;
        config.list = opt.list;

        config.fixed_bugs = if opt.strict {
            KnownBug::iter().collect()
        } else if let Some(codes) = &file.fixed_bugs {
            let mut set = HashSet::new();
            for code in codes {
                match bugs::parse_bug::<KnownBug>(code) {
                    Ok(bug) => {
                        set.insert(bug);
                    }
                    Err(e) => warn!("Config file: {}", e),
                }
            }
            set
        } else {
            HashSet::new()
        };

        config
    }
}

fn get_file_config(file: &Option<PathBuf>) -> Result<ConfigFile, Box<dyn std::error::Error>> {
    let mut file = File::open(config_file(file)?)?;
    let mut s = String::new();
    file.read_to_string(&mut s)?;
    Ok(toml::from_str(&s)?)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfigFile {
    pub(crate) base_url: Option<String>,
    // bug codes, e.g. "API_BUG_004"
    pub(crate) fixed_bugs: Option<Vec<String>>,
}

#[derive(StructOpt, Debug)]
#[structopt(name = "listing-api-check")]
pub(crate) struct Opt {
    /// Base URL of the listing service, e.g. https://qa-internship.avito.com/api/1
    #[structopt(long)]
    base_url: Option<String>,

    /// Output one row per case to this CSV file
    #[structopt(short, long, parse(from_os_str))]
    output_csv: Option<PathBuf>,

    /// Only run cases whose name contains this text
    #[structopt(short, long)]
    filter: Option<String>,

    /// Print the case names and exit without sending any request
    #[structopt(long)]
    list: bool,

    #[structopt(long, help = &STRICT_HELP)]
    strict: bool,

    #[structopt(long, parse(from_os_str), help = &CONFIG_FILE_HELP)]
    config_file: Option<PathBuf>,
}

static STRICT_HELP: Lazy<String> = Lazy::new(|| {
    format!(
        r#"Report every known bug as a failure

known bugs: {}"#,
        KnownBug::VARIANTS.join(", ")
    )
});

static CONFIG_FILE_HELP: Lazy<String> = Lazy::new(|| {
    format!(
        r#"Read config options from this file. Supported options:

    base_url = "<url>"
    fixed_bugs = ["API_BUG_001", ...]

The default file location is '{}'."#,
        config_file(&None)
            .map(|path| path.display().to_string())
            .unwrap_or_else(|_| "listing-api-check.toml".to_string())
    )
});

fn config_file(file: &Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(file) = file {
        return Ok(file.clone());
    }
    dirs::config_dir()
        .filter(|d| d.exists())
        .map(|mut config_dir| {
            config_dir.push("listing-api-check");
            config_dir
        })
        .or_else(|| std::env::current_dir().ok())
        .map(|mut path| {
            path.push("listing-api-check.toml");
            path
        })
        .ok_or_else(|| "Failed to access current working directory".into())
}
