//! rvm-fw: catalog a local Ruby archive mirror and render the files RVM
//! downloads from it.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use rvm_fw_render::Artifact;
use tracing_subscriber::EnvFilter;

use config::Mirror;

#[derive(Parser)]
#[command(name = "rvm-fw", version, about = "Ruby archive mirror for RVM")]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create rvm-fw.toml and an empty archive tree
    Init {
        /// Directory to initialize (default: current directory)
        dir: Option<PathBuf>,
    },
    /// Scan the archive tree and write the catalog snapshot
    Build {
        /// Archive root (default: [archive] root from rvm-fw.toml)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Snapshot file (default: [snapshot] path from rvm-fw.toml)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Render an RVM configuration file from the snapshot
    Render {
        /// Artifact to render
        #[arg(value_enum)]
        artifact: RenderTarget,
        /// Snapshot file (default: [snapshot] path from rvm-fw.toml)
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Host substituted into db URLs, e.g. http://localhost:4567
        #[arg(long)]
        host: Option<String>,
        /// Output file, or directory for `all` (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List catalogued archives and current releases
    List {
        /// Snapshot file (default: [snapshot] path from rvm-fw.toml)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RenderTarget {
    /// config/known
    Known,
    /// config/db
    Db,
    /// config/md5
    Checksums,
    /// releases/stable-version.txt
    Version,
    /// Every artifact, into the --output directory
    All,
}

impl RenderTarget {
    fn artifact(self) -> Option<Artifact> {
        match self {
            RenderTarget::Known => Some(Artifact::Known),
            RenderTarget::Db => Some(Artifact::Db),
            RenderTarget::Checksums => Some(Artifact::Checksums),
            RenderTarget::Version => Some(Artifact::Version),
            RenderTarget::All => None,
        }
    }
}

fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    // stdout carries rendered artifacts, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { dir } => {
            let dir = dir.map_or_else(|| cwd.clone(), |d| cwd.join(d));
            commands::init::run(&dir)
        }

        Commands::Build { root, snapshot } => {
            let mirror = Mirror::discover(&cwd)?;
            let root = resolve(&cwd, root, || mirror.archive_root());
            let snapshot = resolve(&cwd, snapshot, || mirror.snapshot_path());
            commands::build::run(&root, &snapshot).map(|_| ())
        }

        Commands::Render {
            artifact,
            snapshot,
            host,
            output,
        } => {
            let mirror = Mirror::discover(&cwd)?;
            let snapshot = resolve(&cwd, snapshot, || mirror.snapshot_path());
            let host = host.as_deref().or_else(|| mirror.host());
            let output = output.map(|o| cwd.join(o));
            commands::render::run(&snapshot, artifact.artifact(), host, output.as_deref())
        }

        Commands::List { snapshot } => {
            let mirror = Mirror::discover(&cwd)?;
            let snapshot = resolve(&cwd, snapshot, || mirror.snapshot_path());
            commands::list::run(&snapshot)
        }
    }
}

/// A path given on the command line, relative to `cwd`, or the configured one.
fn resolve(cwd: &Path, given: Option<PathBuf>, configured: impl FnOnce() -> PathBuf) -> PathBuf {
    match given {
        Some(path) => cwd.join(path),
        None => configured(),
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, relative.as_bytes()).unwrap();
    }

    #[test]
    fn cli_parses_render_with_options() {
        let cli = Cli::try_parse_from([
            "rvm-fw",
            "--log-level",
            "debug",
            "render",
            "db",
            "--host",
            "http://localhost:4567",
            "-o",
            "out/db",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        match cli.command {
            Commands::Render {
                artifact,
                host,
                output,
                snapshot,
            } => {
                assert_eq!(artifact, RenderTarget::Db);
                assert_eq!(host.as_deref(), Some("http://localhost:4567"));
                assert_eq!(output, Some(PathBuf::from("out/db")));
                assert!(snapshot.is_none());
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn cli_rejects_unknown_artifact() {
        assert!(Cli::try_parse_from(["rvm-fw", "render", "gemsets"]).is_err());
    }

    #[test]
    fn resolve_prefers_command_line() {
        let cwd = Path::new("/work");
        assert_eq!(
            resolve(cwd, Some(PathBuf::from("a.json")), || PathBuf::from("/cfg/b.json")),
            PathBuf::from("/work/a.json")
        );
        assert_eq!(
            resolve(cwd, None, || PathBuf::from("/cfg/b.json")),
            PathBuf::from("/cfg/b.json")
        );
    }

    /// Full workflow: init → add archives → build → render → list.
    #[test]
    fn init_build_render_list_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("mirror");

        // 1. Init
        commands::init::run(&base).unwrap();
        let mirror = Mirror::discover(&base).unwrap();
        let root = mirror.archive_root();

        // 2. Archives
        touch(&root, "ruby-lang/1.8/ruby-1.8.7-p374.tar.bz2");
        touch(&root, "ruby-lang/1.9/ruby-1.9.3-p392.tar.gz");
        touch(&root, "ruby-lang/1.9/ruby-1.9.3-p551.tar.gz");
        touch(&root, "ruby-lang/jruby/jruby-bin-1.7.4.tar.gz");
        touch(&root, "releases/rvm-1.13.0.tar.gz");
        touch(&root, "rubygems/rubygems-1.8.24.tgz");
        touch(&root, "packages/libyaml/yaml-0.1.4.tar.gz");

        // 3. Build
        let catalog = commands::build::run(&root, &mirror.snapshot_path()).unwrap();
        assert_eq!(catalog.len(), 7);
        assert!(mirror.snapshot_path().is_file());

        // 4. Render
        let out = base.join("public/config");
        commands::render::run(
            &mirror.snapshot_path(),
            None,
            Some("http://localhost:4567/"),
            Some(&out),
        )
        .unwrap();

        let known = fs::read_to_string(out.join("known")).unwrap();
        assert!(known.contains("[ruby-]1.9.3[-p551]\n"));
        assert!(known.contains("[ruby-]1.8.7[-p374]\n"));
        assert!(known.contains("jruby[-1.7.4]\n"));

        let db = fs::read_to_string(out.join("db")).unwrap();
        assert!(db.contains("ruby_1.9_url=http://localhost:4567/rubies/ruby-lang/1.9\n"));
        assert!(db.contains("ruby_version=1.9.3\n"));
        assert!(db.contains("rubygems_version=1.8.24\n"));

        let md5 = fs::read_to_string(out.join("md5")).unwrap();
        assert_eq!(md5.lines().count(), 7);

        let version = fs::read_to_string(out.join("stable-version.txt")).unwrap();
        assert_eq!(version, "1.13.0\n");

        // 5. List
        commands::list::run(&mirror.snapshot_path()).unwrap();
    }

    #[test]
    fn build_fails_on_unclassifiable_archive() {
        let dir = tempfile::tempdir().unwrap();
        commands::init::run(dir.path()).unwrap();
        let mirror = Mirror::discover(dir.path()).unwrap();
        touch(&mirror.archive_root(), "ruby-lang/misc/topaz-1.0.tar.gz");

        let err = commands::build::run(&mirror.archive_root(), &mirror.snapshot_path())
            .unwrap_err();
        assert!(format!("{err:#}").contains("topaz-1.0.tar.gz"));
        assert!(!mirror.snapshot_path().exists());
    }
}
