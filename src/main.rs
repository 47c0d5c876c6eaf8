#![forbid(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use mfd_resolver::config::{MfdConfig, locations};
use mfd_resolver::constants::exit;
use mfd_resolver::display::DisplayRegistry;
use mfd_resolver::module::loader::{FsSource, load_catalog};
use mfd_resolver::module::resolver::Resolver;
use mfd_resolver::{cache, logging, report};

/// Resolve cockpit MFD module definitions against the configured display regions
#[derive(Parser, Debug)]
#[command(name = "mfd-resolver", version)]
struct Cli {
    /// Module to select (name or tag), defaults to defaultConfiguration
    #[arg(long = "mod", value_name = "NAME")]
    module: Option<String>,

    /// Sub-Module to select
    #[arg(long = "sub", value_name = "NAME")]
    sub_module: Option<String>,

    /// Enable verbose mode
    #[arg(long)]
    verbose: bool,

    /// Clears the cache
    #[arg(long)]
    clear: bool,

    /// Configuration file, defaults to appsettings.json in the application folder
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Long flags that may also be spelled with a single dash (`-mod F18`)
const LONG_FLAGS: [&str; 5] = ["mod", "sub", "verbose", "clear", "config"];

fn go_style_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            let Some(flag) = arg.strip_prefix('-').filter(|rest| !rest.starts_with('-')) else {
                return arg;
            };
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if LONG_FLAGS.contains(&name) { format!("-{arg}") } else { arg }
        })
        .collect()
}

/// A fatal error together with the process exit code it maps to
struct Failure {
    code: u8,
    error: anyhow::Error,
}

fn exit_with(code: u8) -> impl FnOnce(anyhow::Error) -> Failure {
    move |error| Failure { code, error }
}

/// Module named by `-mod`, else the configured default; empty means none
fn selected_module<'a>(cli: &'a Cli, config: &'a MfdConfig) -> Option<&'a str> {
    cli.module
        .as_deref()
        .or(Some(config.default_configuration.as_str()))
        .filter(|name| !name.is_empty())
}

fn run(cli: &Cli, cache_dir: &Path) -> Result<(), Failure> {
    if cli.verbose {
        info!("Verbose mode is enabled.");
    }

    if cli.clear {
        let message = cache::clear(cache_dir)
            .context("Failed to clear the cache")
            .map_err(exit_with(exit::CACHE))?;
        info!("{message}");
        println!("{message}");
        return Ok(());
    }

    let settings_path = cli.config.clone().unwrap_or_else(locations::settings_file);
    let config = MfdConfig::load(&settings_path)
        .with_context(|| format!("Failed to load configuration from {}", settings_path.display()))
        .map_err(exit_with(exit::CONFIG))?;

    let displays = DisplayRegistry::load(Path::new(&config.display_configuration_file)).map_err(|e| {
        let code = if e.is_parse() { exit::DISPLAY_PARSE } else { exit::DISPLAY_IO };
        Failure { code, error: anyhow::Error::new(e).context("Unable to load display configuration") }
    })?;
    info!("Loaded {} display configurations", displays.len());

    let resolver = Resolver::new(&displays, &config.file_path);
    let catalog = load_catalog(&FsSource::new(config.modules_root()), &resolver)
        .context("Unable to load modules")
        .map_err(exit_with(exit::MODULES))?;
    info!("Loaded {} modules", catalog.len());

    match selected_module(cli, &config) {
        None => println!("{}", report::summary(&catalog)),
        Some(key) => {
            let selected = catalog
                .find_module(key)
                .and_then(|module| report::module_tree(module, &displays, cli.sub_module.as_deref()));
            match selected {
                Some(text) => println!("{text}"),
                None => error!(module = %key, sub = ?cli.sub_module, "No matching module or sub-module"),
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(go_style_args(std::env::args()));

    let _log_guard = match logging::init(cli.verbose, &locations::log_dir()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            None
        }
    };

    info!("Starting MFD resolver");

    match run(&cli, &locations::cache_dir()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(error = %format!("{:#}", failure.error), code = failure.code, "Fatal error");
            ExitCode::from(failure.code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        go_style_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_go_style_args_rewrites_known_flags() {
        assert_eq!(
            args(&["mfd-resolver", "-mod", "F18", "-sub=LEFT", "-verbose"]),
            ["mfd-resolver", "--mod", "F18", "--sub=LEFT", "--verbose"]
        );
    }

    #[test]
    fn test_go_style_args_leaves_others_alone() {
        assert_eq!(
            args(&["mfd-resolver", "--clear", "-h", "-unknown", "-"]),
            ["mfd-resolver", "--clear", "-h", "-unknown", "-"]
        );
    }

    #[test]
    fn test_cli_parses_go_style_flags() {
        let cli = Cli::parse_from(args(&["mfd-resolver", "-mod", "F18", "-sub", "LEFT_DDI", "-clear"]));
        assert_eq!(cli.module.as_deref(), Some("F18"));
        assert_eq!(cli.sub_module.as_deref(), Some("LEFT_DDI"));
        assert!(cli.clear);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    fn cli_with_config(config: &Path) -> Cli {
        Cli {
            module: None,
            sub_module: None,
            verbose: false,
            clear: false,
            config: Some(config.to_path_buf()),
        }
    }

    /// Writes appsettings.json pointing at `displays` and an empty module folder
    fn write_settings(dir: &TempDir, displays: &Path) -> PathBuf {
        let modules = dir.path().join("Modules");
        fs::create_dir_all(&modules).unwrap();

        let settings = dir.path().join("appsettings.json");
        let contents = json!({
            "displayConfigurationFile": displays.to_string_lossy(),
            "modules": modules.to_string_lossy(),
            "filePath": dir.path().join("images").to_string_lossy(),
        });
        fs::write(&settings, contents.to_string()).unwrap();
        settings
    }

    fn run_code(cli: &Cli, cache_dir: &Path) -> Option<u8> {
        run(cli, cache_dir).err().map(|failure| failure.code)
    }

    #[test]
    fn test_run_missing_display_file_is_display_io() {
        let dir = TempDir::new().unwrap();
        let settings = write_settings(&dir, &dir.path().join("missing.json"));

        let code = run_code(&cli_with_config(&settings), &dir.path().join("Cache"));
        assert_eq!(code, Some(exit::DISPLAY_IO));
    }

    #[test]
    fn test_run_malformed_display_file_is_display_parse() {
        let dir = TempDir::new().unwrap();
        let displays = dir.path().join("displays.json");
        fs::write(&displays, "[{ \"name\": ").unwrap();
        let settings = write_settings(&dir, &displays);

        let code = run_code(&cli_with_config(&settings), &dir.path().join("Cache"));
        assert_eq!(code, Some(exit::DISPLAY_PARSE));
    }

    #[test]
    fn test_run_stops_before_loading_modules() {
        let dir = TempDir::new().unwrap();
        let displays = dir.path().join("displays.json");
        fs::write(&displays, "not json").unwrap();
        let settings = write_settings(&dir, &displays);
        // A module load would fail with MODULES, so only the display code can surface
        fs::remove_dir_all(dir.path().join("Modules")).unwrap();

        let code = run_code(&cli_with_config(&settings), &dir.path().join("Cache"));
        assert_eq!(code, Some(exit::DISPLAY_PARSE));
    }

    #[test]
    fn test_run_missing_config_is_config_failure() {
        let dir = TempDir::new().unwrap();
        let code = run_code(&cli_with_config(&dir.path().join("nope.json")), &dir.path().join("Cache"));
        assert_eq!(code, Some(exit::CONFIG));
    }

    #[test]
    fn test_run_missing_modules_root_is_modules_failure() {
        let dir = TempDir::new().unwrap();
        let displays = dir.path().join("displays.json");
        fs::write(&displays, r#"[{ "name": "LEFT" }]"#).unwrap();
        let settings = write_settings(&dir, &displays);
        fs::remove_dir_all(dir.path().join("Modules")).unwrap();

        let code = run_code(&cli_with_config(&settings), &dir.path().join("Cache"));
        assert_eq!(code, Some(exit::MODULES));
    }

    #[test]
    fn test_run_succeeds_with_valid_files() {
        let dir = TempDir::new().unwrap();
        let displays = dir.path().join("displays.json");
        fs::write(&displays, r#"[{ "name": "LEFT", "width": 100, "height": 100 }]"#).unwrap();
        let settings = write_settings(&dir, &displays);
        fs::write(
            dir.path().join("Modules").join("hornet.json"),
            r#"{ "modules": [ { "name": "FA-18C", "configurations": [ { "name": "LEFT_DDI" } ] } ] }"#,
        )
        .unwrap();

        assert!(run(&cli_with_config(&settings), &dir.path().join("Cache")).is_ok());
    }

    #[test]
    fn test_run_clear_skips_configuration() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("Cache");
        fs::create_dir_all(cache_dir.join("F18")).unwrap();
        fs::write(cache_dir.join("F18").join("left.png"), b"png").unwrap();

        // The configuration file does not exist; clearing must not need it
        let mut cli = cli_with_config(&dir.path().join("nope.json"));
        cli.clear = true;

        assert!(run(&cli, &cache_dir).is_ok());
        assert!(!cache_dir.exists());
    }

    #[test]
    fn test_selected_module_falls_back_to_default_configuration() {
        let mut config = MfdConfig::default();
        let mut cli = cli_with_config(Path::new("unused.json"));
        assert_eq!(selected_module(&cli, &config), None);

        config.default_configuration = "F18".to_string();
        assert_eq!(selected_module(&cli, &config), Some("F18"));

        cli.module = Some("A10".to_string());
        assert_eq!(selected_module(&cli, &config), Some("A10"));
    }
}
