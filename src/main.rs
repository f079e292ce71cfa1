//! xhotplugd - Main entry point
//!
//! X11 hotplug daemon: runs a user script when monitors or input devices
//! come and go.

use std::env;
use std::path::PathBuf;
use std::process;

use xhotplugd::exec::ScriptExec;
use xhotplugd::watch::Watcher;

/// Daemon version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// rc-file name looked up under $XDG_CONFIG_HOME and $HOME
const RC_NAME: &str = "xhotplugrc";

fn print_usage() {
    println!("xhotplugd v{}", VERSION);
    println!("X11 hotplug daemon, runs a script on monitor and input device changes");
    println!();
    println!("Usage: xhotplugd [OPTIONS] [FILE]");
    println!();
    println!("Options:");
    println!("  -l LEVEL      Log level: off, error, warn, info, debug, trace (default: info)");
    println!("  -n            Run in foreground, do not fork to background");
    println!("  -p            Probe currently connected outputs, print EDID info and exit");
    println!("  -v            Show program version");
    println!("  -h, --help    Show this help message");
    println!();
    println!("  FILE          Script to run, default $XDG_CONFIG_HOME/{}", RC_NAME);
    println!("                falling back to ~/.config/{} and ~/.{}", RC_NAME, RC_NAME);
    println!();
    println!("The script is called as: FILE <kind> <subject> <action> <detail>");
    println!("e.g.  display HDMI-1 connected \"ACME Display\"");
    println!("      keyboard 12 disconnected \"AT Translated Set 2 keyboard\"");
}

#[derive(Debug, Default)]
struct Config {
    log_level: Option<log::LevelFilter>,
    foreground: bool,
    probe: bool,
    script: Option<PathBuf>,
}

fn parse_level(level: &str) -> Result<log::LevelFilter, String> {
    match level {
        "off" | "none" => Ok(log::LevelFilter::Off),
        "error" | "err" => Ok(log::LevelFilter::Error),
        "warn" => Ok(log::LevelFilter::Warn),
        "info" | "notice" => Ok(log::LevelFilter::Info),
        "debug" => Ok(log::LevelFilter::Debug),
        "trace" => Ok(log::LevelFilter::Trace),
        _ => Err(format!("Invalid log level: {}", level)),
    }
}

fn parse_args() -> Result<Config, String> {
    let mut config = Config::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-v" => {
                println!("v{}", VERSION);
                process::exit(0);
            }
            "-l" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for -l".to_string());
                }
                config.log_level = Some(parse_level(&args[i])?);
            }
            "-n" => {
                config.foreground = true;
            }
            "-p" => {
                config.probe = true;
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            arg => {
                if config.script.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                config.script = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    Ok(config)
}

/// Locate the hotplug script: an explicit argument wins, then the XDG
/// config directory, then the home-directory fallbacks. Only existing
/// files count.
fn rcfile(arg: Option<&PathBuf>) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(path) = arg {
        candidates.push(path.clone());
    } else {
        if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(config_home).join(RC_NAME));
        }
        if let Ok(home) = env::var("HOME") {
            candidates.push(PathBuf::from(&home).join(".config").join(RC_NAME));
            candidates.push(PathBuf::from(&home).join(format!(".{}", RC_NAME)));
        }
    }

    candidates.into_iter().find(|path| path.is_file())
}

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = config.log_level {
        builder.filter_level(level);
    }
    builder.init();

    let mut watcher = match Watcher::open() {
        Ok(watcher) => watcher,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    if config.probe {
        if let Err(err) = watcher.probe() {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
        return;
    }

    let script = match rcfile(config.script.as_ref()) {
        Some(script) => script,
        None => {
            eprintln!("Error: no hotplug script found");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    log::info!("xhotplugd v{}", VERSION);
    log::info!("Script: {}", script.display());

    ScriptExec::init();
    let mut runner = ScriptExec::new(script);

    if !config.foreground {
        if let Err(err) = nix::unistd::daemon(false, false) {
            eprintln!("Failed backgrounding: {}", err);
            process::exit(1);
        }
    }

    if let Err(err) = watcher.run(&mut runner) {
        log::error!("{}", err);
        process::exit(1);
    }
}
