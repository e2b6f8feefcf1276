use anyhow::Result;
use docscrub_config::Config;
use std::path::Path;

pub fn handle(config: &Config, explicit: Option<&Path>, path_only: bool) -> Result<()> {
    if path_only {
        match explicit {
            Some(path) => println!("{}", path.display()),
            None => println!("{}", Config::config_path().display()),
        }
        return Ok(());
    }

    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
