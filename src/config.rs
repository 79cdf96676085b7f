use crate::error::Error;
use config::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Software,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// PKCS#1 v1.5 block type 1 over the raw data
    #[default]
    Pkcs1,
    None,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SignConfig {
    pub backend: Backend,
    pub padding: Padding,
}

impl SignConfig {
    pub const ENV_PREFIX: &'static str = "STPM_SIGN";
    pub const ENV_FILE: &'static str = "STPM_SIGN_CONFIG";
    pub const FILE_NAME: &'static str = ".stpm-sign.json";

    /// `$STPM_SIGN_CONFIG`, otherwise `$HOME/.stpm-sign.json`
    pub fn default_file() -> Option<PathBuf> {
        std::env::var_os(Self::ENV_FILE)
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|h| h.join(Self::FILE_NAME)))
    }

    /// defaults < json file (if it exists) < `STPM_SIGN__*` environment variables
    pub fn load(f: Option<PathBuf>) -> Result<Self, Error> {
        let default_config =
            Config::try_from(&SignConfig::default()).map_err(|e| Error::Config(e.to_string()))?;

        let mut config = Config::builder().add_source(default_config);

        if let Some(f) = f {
            log::trace!("config file: {}", f.display());
            config = config.add_source(
                config::File::from(f)
                    .format(config::FileFormat::Json)
                    .required(false),
            );
        }

        let config = config
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let config: SignConfig = config
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;

        log::trace!("{:?}", config);

        Ok(config)
    }
}
