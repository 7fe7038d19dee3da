//! CLI argument definitions for the publisher.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::config::PublisherConfig;
use camino::Utf8PathBuf;
use clap::Parser;

/// Stage the swagger-ui stylesheets as a standalone npm package.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "swagger-ui-scss-publisher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Stage the swagger-ui stylesheets as a standalone npm package.\n\n",
    "The publisher resolves the newest release tag of swagger-ui, compares it ",
    "with the version on the npm registry and, when upstream is ahead, clones ",
    "that release and stages its SCSS sources, licence, security policy and ",
    "the local README.md with a synthesised package.json under tmp/.\n\n",
    "The run exits with status 1 when the registry is already up to date, so ",
    "CI jobs can skip the publish step.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Stage the next release from the current directory:\n",
    "    $ swagger-ui-scss-publisher\n\n",
    "  Stage without installing dependencies:\n",
    "    $ swagger-ui-scss-publisher --skip-install\n\n",
    "  Show every external command:\n",
    "    $ RUST_LOG=debug swagger-ui-scss-publisher\n",
))]
pub struct Cli {
    /// Directory holding README.md and the tmp/ scratch tree [default: current directory].
    #[arg(short, long, value_name = "DIR")]
    pub workdir: Option<Utf8PathBuf>,

    /// Base URL of the npm registry to query.
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,

    /// Git URL of the upstream swagger-ui repository.
    #[arg(long, value_name = "URL")]
    pub upstream: Option<String>,

    /// Stop after writing package.json instead of running `npm install`.
    #[arg(long)]
    pub skip_install: bool,

    /// Suppress progress output (warnings and errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Build the run configuration rooted at `workdir`.
    ///
    /// Flags that were not given keep the production defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use swagger_ui_scss_publisher::cli::Cli;
    ///
    /// let cli = Cli {
    ///     registry: Some("http://localhost:4873".to_owned()),
    ///     ..Cli::default()
    /// };
    /// let config = cli.config(Utf8PathBuf::from("/work"));
    /// assert_eq!(config.registry_url, "http://localhost:4873");
    /// ```
    #[must_use]
    pub fn config(&self, workdir: Utf8PathBuf) -> PublisherConfig {
        let mut config = PublisherConfig::new(workdir);
        if let Some(registry) = &self.registry {
            config.registry_url.clone_from(registry);
        }
        if let Some(upstream) = &self.upstream {
            config.upstream_url.clone_from(upstream);
        }
        config.skip_install = self.skip_install;
        config
    }
}
