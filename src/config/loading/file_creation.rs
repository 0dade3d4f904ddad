use crate::{CmdTreeError, Result};
use std::{fs, path::Path};

const DEFAULT_CONFIG: &str = "# cmdtree configuration file\n\
#\n\
# [general]\n\
# log_level = \"info\"\n\
# log_format = \"pretty\"\n\
#\n\
# [commands]\n\
# prefix = \"/\"\n\
# default_locale = \"en_US\"\n\
#\n\
# [confirm]\n\
# timeout_secs = 30\n\
#\n\
# [aliases]\n\
# gm = \"gamemode\"\n";

/// Creates a commented default configuration file if it doesn't exist
pub fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CmdTreeError::Config(format!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|e| {
        CmdTreeError::Config(format!(
            "Failed to create config file {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}
