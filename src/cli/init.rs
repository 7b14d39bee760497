//! taskmgr init command implementation
//!
//! Creates the data directory with a default `.taskmgr.toml`, the credential
//! file holding the admin account and an empty task file.

use std::path::{Path, PathBuf};

use crate::cli::Login;
use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session;

pub struct InitOptions {
    pub login: Login,
    pub json: bool,
    pub quiet: bool,
}

/// Which files this run had to create
#[derive(Debug, serde::Serialize)]
struct Created {
    config: bool,
    users_file: bool,
    tasks_file: bool,
}

#[derive(serde::Serialize)]
struct InitData {
    dir: PathBuf,
    created: Created,
}

pub fn run(options: InitOptions) -> Result<()> {
    let dir = options.login.data_dir()?;
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Validation(format!(
            "Data path {} is not a directory",
            dir.display()
        )));
    }
    std::fs::create_dir_all(&dir)?;

    let wrote_config = write_default_config(&dir.join(CONFIG_FILE))?;
    let config = Config::load_from_dir(&dir);
    let bootstrap = session::bootstrap(&config, &dir)?;
    let created = Created {
        config: wrote_config,
        users_file: bootstrap.users_file,
        tasks_file: bootstrap.tasks_file,
    };

    let new_files: Vec<&str> = [
        (created.config, CONFIG_FILE),
        (created.users_file, config.files.users.as_str()),
        (created.tasks_file, config.files.tasks.as_str()),
    ]
    .into_iter()
    .filter_map(|(made, name)| made.then_some(name))
    .collect();

    let mut human = HumanOutput::new(if new_files.is_empty() {
        "taskmgr init: nothing to do"
    } else {
        "taskmgr init: initialized data directory"
    });
    human.push_summary("dir", dir.display().to_string());
    if !new_files.is_empty() {
        human.push_summary("created", new_files.join(", "));
    }
    if created.users_file {
        human.push_warning(format!(
            "default account '{}' created; register your own users",
            config.accounts.admin_username
        ));
    }
    human.push_next_step("taskmgr --user <name> --password <password> shell");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "init",
        &InitData { dir, created },
        Some(&human),
    )
}

/// Write the default config unless one is already there.
fn write_default_config(path: &Path) -> Result<bool> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(false),
        Ok(_) => Err(Error::InvalidConfig(format!(
            "{} is not a regular file",
            path.display()
        ))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Config::default().save(path)?;
            Ok(true)
        }
        Err(err) => Err(err.into()),
    }
}
