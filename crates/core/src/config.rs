use crate::chat::PLACEHOLDER_PASSWORD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml_edit::{value, DocumentMut};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config file is not valid toml")]
    Parse(#[from] toml_edit::TomlError),
    #[error("config file contains an invalid value")]
    Deserialize(#[from] toml::de::Error),
}

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, i64, bool);

macro_rules! gen_config {
    (
        $( $(#[$meta:meta])* $name:ident: $type:ty = $default:expr),*
    ) => {
        #[derive(Serialize, Deserialize, Debug, Clone)]
        pub struct ChatConfig {
            $(
                $(#[$meta])*
                pub $name: $type,
            )*
        }

        impl Default for ChatConfig {
            fn default() -> ChatConfig {
                ChatConfig {
                    $( $name: $default, )*
                }
            }
        }

        impl ChatConfig {
            /// Parses `source`, filling in every missing key with its default.
            /// Returns the config along with the patched document text.
            pub fn patch(source: &str) -> Result<(ChatConfig, String), ConfigError> {
                let mut doc = source.parse::<DocumentMut>()?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config(
                        $default,
                        stringify!($name),
                        &mut doc,
                    );
                )*

                let patched = doc.to_string();
                let config = toml::from_str(&patched)?;
                Ok((config, patched))
            }
        }
    };
}

gen_config! {
    /// Shown as the capacity in the online player list.
    user_limit: i64 = 50,
    /// Password accepted by `/auth`. The factory default is never accepted.
    admin_password: String = PLACEHOLDER_PASSWORD.to_string()
}

impl ChatConfig {
    /// Loads the config at `path`, creating the file or appending missing
    /// keys so operators can see every available setting.
    pub fn load(path: impl AsRef<Path>) -> Result<ChatConfig, ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let str = match fs::read_to_string(path) {
            Ok(str) => str,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(io_err(err)),
        };

        let (config, patched) = ChatConfig::patch(&str)?;
        if str != patched {
            fs::write(path, &patched).map_err(io_err)?;
        }
        Ok(config)
    }
}
