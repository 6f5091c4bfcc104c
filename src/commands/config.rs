//! Config subcommands handler

use anyhow::Result;

use termsnap::Config;

/// Show the effective configuration as TOML.
///
/// Defaults are filled in for anything the file leaves out.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<()> {
    let config = Config::load()?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Print where the config file is read from, noting if it does not exist.
#[cfg(not(tarpaulin_include))]
pub fn handle_path() -> Result<()> {
    let config_path = Config::config_path()?;
    if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{} (not created, using defaults)", config_path.display());
    }
    Ok(())
}
