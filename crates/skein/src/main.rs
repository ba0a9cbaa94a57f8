use std::io::Write as _;

use anyhow::Context as _;
use camino::Utf8PathBuf;
use clap::Parser;
use skein_db::{RootDatabase, check_file, inject, injection_hosts};
use skein_errors::Renderer;
use skein_inputs::{File, LineCol};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Checks string templates and rewrites them the way an injection editor would.
#[derive(Parser)]
#[command(version)]
enum Options {
    /// Report parse diagnostics.
    Check {
        path: Utf8PathBuf,
        /// Render diagnostics without colors.
        #[arg(long)]
        plain: bool,
    },
    /// List string templates and whether they can host an injection.
    Hosts { path: Utf8PathBuf },
    /// Rewrite the string template covering `offset` and print the new document.
    Inject {
        path: Utf8PathBuf,
        #[arg(long)]
        offset: u32,
        /// Either a complete template literal or new decoded content.
        #[arg(long)]
        text: String,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("SKEIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let db = RootDatabase::default();
    match Options::parse() {
        Options::Check { path, plain } => {
            let file = read(&db, path)?;
            let renderer = if plain { Renderer::plain() } else { Renderer::styled() };

            let path = file.path(&db).as_str();
            let text = file.text(&db);
            let diagnostics = check_file(&db, file);
            for diagnostic in diagnostics {
                eprintln!("{}", diagnostic.render(&renderer, path, text));
            }

            let errors = diagnostics.len();
            if errors > 0 {
                anyhow::bail!("`{path}` has {errors} error(s)");
            }
        }
        Options::Hosts { path } => {
            let file = read(&db, path)?;
            let mut stdout = std::io::stdout().lock();

            for host in injection_hosts(&db, file) {
                let LineCol { line, col } = file.line_col(&db, host.range.start());
                let flavour = if host.raw { "raw" } else { "regular" };
                let validity = if host.valid { "valid" } else { "invalid" };
                write!(
                    stdout,
                    "{}:{line}:{col} {flavour} {validity} entries={} interpolations={} one_line={}",
                    file.path(&db),
                    host.entries,
                    host.interpolations,
                    host.one_line,
                )?;
                match &host.decoded {
                    Some(decoded) => writeln!(stdout, " {decoded:?}")?,
                    None => writeln!(stdout)?,
                }
            }
        }
        Options::Inject { path, offset, text } => {
            let file = read(&db, path)?;
            let document = inject(&db, file, offset.into(), &text)
                .with_context(|| format!("cannot inject into `{}`", file.path(&db)))?;
            print!("{document}");
        }
    }

    Ok(())
}

fn read(db: &RootDatabase, path: Utf8PathBuf) -> anyhow::Result<File> {
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read `{path}`"))?;
    Ok(File::new(db, path, text))
}
