use std::path::Path;

use anyhow::Result;
use fincal_core::fincal_config::FincalConfig;

pub fn path(explicit: Option<&Path>) -> Result<()> {
    match explicit {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", FincalConfig::config_path()?.display()),
    }
    Ok(())
}

pub fn show(config: &FincalConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
