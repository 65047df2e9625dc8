//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::config::BuildMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Atrium static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: atrium.toml)
    #[arg(short = 'C', long, default_value = "atrium.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Build mode. Production builds leave the authoring tool out.
    ///
    /// Falls back to the `ATRIUM_ENV` environment variable, then `[build].mode`.
    #[arg(long, value_enum)]
    pub mode: Option<BuildMode>,

    /// enable sitemap generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,

    /// Override base URL for the site.
    ///
    /// Useful for CI/CD deployments where the production URL differs from local development.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a template site
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Validate content and render the site into the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Validate content files without rendering anything
    Check,

    /// Print the authoring schema as JSON
    Schema,

    /// Serve the site. Rebuild on change and expose the editor in development mode
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// enable watch
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    /// Build arguments of the current command, if it builds.
    pub fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } | Commands::Serve { build_args, .. } => Some(build_args),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_with_mode() {
        let cli = Cli::try_parse_from(["atrium", "build", "--mode", "production", "--clean"]).unwrap();
        let args = cli.build_args().unwrap();

        assert_eq!(args.mode, Some(BuildMode::Production));
        assert!(args.clean);
        assert_eq!(args.minify, None);
    }

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from(["atrium", "-r", "site", "serve", "-p", "8080", "-w", "false"])
            .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("site")));
        match cli.command {
            Commands::Serve { port, watch, .. } => {
                assert_eq!(port, Some(8080));
                assert_eq!(watch, Some(false));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_check_has_no_build_args() {
        let cli = Cli::try_parse_from(["atrium", "check"]).unwrap();
        assert!(cli.build_args().is_none());
        assert!(!cli.is_init());
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["atrium", "build", "--mode", "staging"]).is_err());
    }
}
