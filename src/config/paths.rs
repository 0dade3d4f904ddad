use std::{
    env, fs,
    io::{Error, ErrorKind},
    path::PathBuf,
};

const APP_DIR: &str = "cmdtree";

/// Resolves `$<xdg_var>/cmdtree`, falling back to `$HOME/<home_relative>/cmdtree`.
fn xdg_dir(xdg_var: &str, home_relative: &str) -> Result<PathBuf, Error> {
    env::var_os(xdg_var)
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(home_relative)))
        .map(|base| base.join(APP_DIR))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("Neither {xdg_var} nor HOME environment variable found"),
            )
        })
}

fn created(dir: PathBuf) -> Result<PathBuf, Error> {
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Locations of cmdtree's files, following the XDG base directories.
pub struct ConfigPaths;

impl ConfigPaths {
    /// `$XDG_CONFIG_HOME/cmdtree`, or `~/.config/cmdtree`.
    ///
    /// # Errors
    /// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set
    pub fn config_dir() -> Result<PathBuf, Error> {
        xdg_dir("XDG_CONFIG_HOME", ".config")
    }

    /// `$XDG_DATA_HOME/cmdtree`, or `~/.local/share/cmdtree`. Created on
    /// first use.
    ///
    /// # Errors
    /// Returns an error if no base directory is set or it cannot be created
    pub fn data_dir() -> Result<PathBuf, Error> {
        created(xdg_dir("XDG_DATA_HOME", ".local/share")?)
    }

    /// The `logs` directory inside [`data_dir`](Self::data_dir).
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created
    pub fn log_dir() -> Result<PathBuf, Error> {
        created(Self::data_dir()?.join("logs"))
    }

    /// The main configuration file, `config.toml` in
    /// [`config_dir`](Self::config_dir).
    ///
    /// # Errors
    /// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set
    pub fn main_config() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
