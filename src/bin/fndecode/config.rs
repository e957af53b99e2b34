use std::path::{Path, PathBuf};

use fndecode::decode::{DecodeConfig, Destination, PLACEHOLDER_EXTENSION, ResolverOptions, parse_drop_payload};

use crate::Args;

/// Final config created from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) destination: Destination,
    pub(crate) log: bool,
    pub(crate) options: ResolverOptions,
    pub(crate) paths: Vec<String>,
    pub(crate) preserve_original: bool,
    pub(crate) verbose: bool,
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed,
    /// or if no input paths were given.
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let user_config = DecodeConfig::get_user_config()?;
        Self::from_args_and_user_config(args, user_config)
    }

    fn from_args_and_user_config(args: Args, user_config: DecodeConfig) -> anyhow::Result<Self> {
        let mut paths = args.paths;
        if let Some(payload) = args.payload.as_deref() {
            paths.extend(parse_drop_payload(payload));
        }
        if paths.is_empty() {
            anyhow::bail!("No input files given");
        }

        // CLI args > config file > default
        let destination = if args.source_dir {
            Destination::SourceDirectory
        } else if let Some(output) = args.output {
            Destination::Directory(dunce::simplified(&output).to_path_buf())
        } else if user_config.source_dir {
            Destination::SourceDirectory
        } else if let Some(output) = user_config.output.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Destination::Directory(expand_home(output))
        } else {
            Destination::Directory(fndecode::default_output_dir())
        };

        let placeholder_extensions = if user_config.placeholder_extensions.is_empty() {
            vec![PLACEHOLDER_EXTENSION.to_string()]
        } else {
            user_config.placeholder_extensions
        };

        Ok(Self {
            destination,
            log: args.log || user_config.log,
            options: ResolverOptions {
                naming: args.naming.unwrap_or(user_config.naming),
                placeholder_extensions,
                dryrun: args.print || user_config.dryrun,
            },
            paths,
            preserve_original: !(args.move_files || user_config.move_files),
            verbose: args.verbose || user_config.verbose,
        })
    }
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => Path::new(path).to_path_buf(),
    }
}

#[cfg(test)]
mod config_from_args_tests {
    use super::*;

    use fndecode::decode::NamingStyle;

    fn default_args() -> Args {
        Args {
            paths: vec!["/tmp/Hello%20World.txt".to_string()],
            payload: None,
            output: None,
            source_dir: false,
            move_files: false,
            naming: None,
            print: false,
            log: false,
            completion: None,
            verbose: false,
        }
    }

    #[test]
    fn defaults_copy_to_desktop() {
        let config = Config::from_args_and_user_config(default_args(), DecodeConfig::default()).unwrap();
        assert!(config.preserve_original);
        assert_eq!(
            config.destination,
            Destination::Directory(fndecode::default_output_dir())
        );
        assert_eq!(config.options.naming, NamingStyle::Copy);
        assert_eq!(config.options.placeholder_extensions, vec![PLACEHOLDER_EXTENSION]);
        assert!(!config.options.dryrun);
    }

    #[test]
    fn no_paths_is_an_error() {
        let mut args = default_args();
        args.paths.clear();
        assert!(Config::from_args_and_user_config(args, DecodeConfig::default()).is_err());
    }

    #[test]
    fn payload_paths_are_appended() {
        let mut args = default_args();
        args.payload = Some("{/tmp/a b.txt} /tmp/c.txt".to_string());
        let config = Config::from_args_and_user_config(args, DecodeConfig::default()).unwrap();
        assert_eq!(
            config.paths,
            vec!["/tmp/Hello%20World.txt", "/tmp/a b.txt", "/tmp/c.txt"]
        );
    }

    #[test]
    fn payload_alone_is_enough() {
        let mut args = default_args();
        args.paths.clear();
        args.payload = Some("/tmp/x%20y.txt".to_string());
        let config = Config::from_args_and_user_config(args, DecodeConfig::default()).unwrap();
        assert_eq!(config.paths, vec!["/tmp/x%20y.txt"]);
    }

    #[test]
    fn cli_flags_override_defaults() {
        let mut args = default_args();
        args.move_files = true;
        args.print = true;
        args.log = true;
        args.verbose = true;
        args.naming = Some(NamingStyle::Parenthesized);
        args.output = Some(PathBuf::from("/tmp/out"));

        let config = Config::from_args_and_user_config(args, DecodeConfig::default()).unwrap();
        assert!(!config.preserve_original);
        assert!(config.options.dryrun);
        assert!(config.log);
        assert!(config.verbose);
        assert_eq!(config.options.naming, NamingStyle::Parenthesized);
        assert_eq!(config.destination, Destination::Directory(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn user_config_values_are_used() {
        let user_config = DecodeConfig::from_toml_str(
            r#"
[fndecode]
output = "/tmp/decoded"
move_files = true
naming = "parenthesized"
placeholder_extensions = ["part"]
"#,
        )
        .unwrap();

        let config = Config::from_args_and_user_config(default_args(), user_config).unwrap();
        assert_eq!(config.destination, Destination::Directory(PathBuf::from("/tmp/decoded")));
        assert!(!config.preserve_original);
        assert_eq!(config.options.naming, NamingStyle::Parenthesized);
        assert_eq!(config.options.placeholder_extensions, vec!["part"]);
    }

    #[test]
    fn cli_output_overrides_user_source_dir() {
        let user_config = DecodeConfig::from_toml_str("[fndecode]\nsource_dir = true\n").unwrap();
        let mut args = default_args();
        args.output = Some(PathBuf::from("/tmp/out"));

        let config = Config::from_args_and_user_config(args, user_config).unwrap();
        assert_eq!(config.destination, Destination::Directory(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn source_dir_flag() {
        let mut args = default_args();
        args.source_dir = true;
        let config = Config::from_args_and_user_config(args, DecodeConfig::default()).unwrap();
        assert_eq!(config.destination, Destination::SourceDirectory);
    }

    #[test]
    fn expand_home_replaces_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/Fixed"), home.join("Fixed"));
            assert_eq!(expand_home("~"), home);
        }
        assert_eq!(expand_home("/tmp/~x"), PathBuf::from("/tmp/~x"));
    }
}
