use anyhow::{bail, Context};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use quire_core::{
    config, export_text, renumber, save_all, scan_scenes, write_outline, CoreConfig, ExportDepth,
    ExportOptions, IncludeOptions, PovReference, SceneFile, SceneTitle,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

use report::SceneReport;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Quire scene file tools")]
struct Cli {
    /// Directory relative paths are resolved against (overrides QUIRE_PROJECT_DIR)
    #[arg(long, global = true)]
    project_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Toml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum IncludeArg {
    Default,
    Always,
    Never,
}

impl From<IncludeArg> for IncludeOptions {
    fn from(value: IncludeArg) -> Self {
        match value {
            IncludeArg::Default => IncludeOptions::Default,
            IncludeArg::Always => IncludeOptions::Always,
            IncludeArg::Never => IncludeOptions::Never,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show a scene's metadata
    Show {
        /// Scene file
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Check that scene files, or every scene in a folder, load cleanly
    Check {
        /// Scene files or folders
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Rewrite scene files with a canonical header
    Normalize {
        /// Scene files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Create a new scene
    New {
        /// Scene name (optional)
        name: Option<String>,
        /// Folder to create the scene in (defaults to the project directory)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Position in the folder (defaults to after the last scene)
        #[arg(long)]
        index: Option<usize>,
    },
    /// Update a scene's metadata, renaming the file if its name changes
    Set {
        /// Scene file
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Point of view as `Name`, `[Name|id]`, or an empty string to clear it
        #[arg(long)]
        pov: Option<String>,
        /// Include the scene in exports
        #[arg(long, conflicts_with = "exclude")]
        include: bool,
        /// Leave the scene out of exports
        #[arg(long)]
        exclude: bool,
        #[arg(long, value_enum)]
        include_title: Option<IncludeArg>,
        #[arg(long, value_enum)]
        break_at_end: Option<IncludeArg>,
    },
    /// Print a Markdown outline of a folder's scenes
    Outline {
        /// Folder (defaults to the project directory)
        dir: Option<PathBuf>,
        /// Heading level for scene titles
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },
    /// Print the included scenes of a folder as one Markdown manuscript
    Export {
        /// Folder (defaults to the project directory)
        dir: Option<PathBuf>,
        /// Heading level for scene titles
        #[arg(long, default_value_t = 1)]
        depth: usize,
        /// Only title scenes whose heading level is at most this
        #[arg(long, conflicts_with = "no_titles")]
        title_depth: Option<usize>,
        /// Only title scenes that always include their title
        #[arg(long)]
        no_titles: bool,
        /// Put a break after scenes that do not choose for themselves
        #[arg(long)]
        breaks: bool,
    },
    /// Count the words in scene bodies
    Count {
        /// Scene files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Number a folder's scenes contiguously from zero, renaming files to match
    Renumber {
        /// Folder (defaults to the project directory)
        dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quire=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let project_dir = config::project_dir_from_env_value(
        cli.project_dir
            .or_else(|| std::env::var("QUIRE_PROJECT_DIR").ok()),
    )?;
    let filename_max_length = config::filename_max_length_from_env_value(
        std::env::var("QUIRE_FILENAME_MAX_LENGTH").ok(),
    )?;
    let cfg = CoreConfig::new(project_dir, filename_max_length)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if run(command, &cfg, &mut out)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Run one command, writing its report to `out`. Returns `false` when the command found problems
/// that should fail the process without being errors themselves.
fn run(command: Commands, cfg: &CoreConfig, out: &mut impl Write) -> anyhow::Result<bool> {
    match command {
        Commands::Show { file, format } => show(&cfg.resolve(&file), format, out)?,
        Commands::Check { paths } => return check(&paths, cfg, out),
        Commands::Normalize { files } => normalize(&files, cfg, out)?,
        Commands::New { name, dir, index } => {
            let dir = folder_or_project_dir(dir, cfg);
            new_scene(name.as_deref(), &dir, index, cfg, out)?
        }
        Commands::Set {
            file,
            name,
            summary,
            notes,
            pov,
            include,
            exclude,
            include_title,
            break_at_end,
        } => {
            let mut scene = load(&cfg.resolve(&file))?;
            if let Some(name) = name {
                scene.document_mut().metadata.name = SceneTitle::new(&name)?.into_string();
            }
            if let Some(summary) = summary {
                scene.document_mut().metadata.summary = summary;
            }
            if let Some(notes) = notes {
                scene.document_mut().metadata.notes = notes;
            }
            if let Some(pov) = pov {
                scene.document_mut().metadata.pov = PovReference::parse(pov.trim());
            }
            if include || exclude {
                scene
                    .document_mut()
                    .metadata
                    .compile_status
                    .set_include(include);
            }
            if let Some(options) = include_title {
                scene
                    .document_mut()
                    .metadata
                    .compile_status
                    .set_include_title(options.into());
            }
            if let Some(options) = break_at_end {
                scene
                    .document_mut()
                    .metadata
                    .compile_status
                    .set_break_at_end(options.into());
            }
            save_and_report(&mut scene, cfg, out)?;
        }
        Commands::Outline { dir, depth } => {
            let dir = folder_or_project_dir(dir, cfg);
            let result = scan_scenes(&dir)?;
            for (path, err) in &result.failures {
                tracing::warn!("leaving {} out of the outline: {}", path.display(), err);
            }
            write!(out, "{}", write_outline(&result.scenes, depth))?;
        }
        Commands::Export {
            dir,
            depth,
            title_depth,
            no_titles,
            breaks,
        } => {
            let scene_title_depth = match (title_depth, no_titles) {
                (_, true) => ExportDepth::None,
                (Some(max_depth), false) => ExportDepth::UpTo(max_depth),
                (None, false) => ExportDepth::All,
            };
            let options = ExportOptions {
                depth,
                scene_title_depth,
                insert_breaks: breaks,
            };
            let dir = folder_or_project_dir(dir, cfg);
            let result = scan_scenes(&dir)?;
            for (path, err) in &result.failures {
                tracing::warn!("leaving {} out of the export: {}", path.display(), err);
            }
            write!(out, "{}", export_text(&result.scenes, &options))?;
        }
        Commands::Count { files } => {
            let mut total = 0;
            for file in &files {
                let path = cfg.resolve(file);
                let words = load(&path)?.word_count();
                total += words;
                writeln!(out, "{words}\t{}", path.display())?;
            }
            if files.len() > 1 {
                writeln!(out, "{total}\ttotal")?;
            }
        }
        Commands::Renumber { dir } => {
            let dir = folder_or_project_dir(dir, cfg);
            renumber_folder(&dir, cfg, out)?;
        }
    }

    Ok(true)
}

fn folder_or_project_dir(dir: Option<PathBuf>, cfg: &CoreConfig) -> PathBuf {
    match dir {
        Some(dir) => cfg.resolve(&dir),
        None => cfg.project_dir().to_path_buf(),
    }
}

fn load(path: &Path) -> anyhow::Result<SceneFile> {
    SceneFile::load(path).with_context(|| format!("Failed to load scene {}", path.display()))
}

fn show(path: &Path, format: OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    let scene = load(path)?;
    let report = SceneReport::new(&scene);
    match format {
        OutputFormat::Text => write!(out, "{report}")?,
        OutputFormat::Toml => write!(out, "{}", toml::to_string(&report)?)?,
    }
    Ok(())
}

fn check(paths: &[PathBuf], cfg: &CoreConfig, out: &mut impl Write) -> anyhow::Result<bool> {
    let mut all_ok = true;

    for path in paths {
        let path = cfg.resolve(path);
        if path.is_dir() {
            let result = scan_scenes(&path)?;
            for scene in &result.scenes {
                writeln!(out, "ok\t{}", scene.path().display())?;
            }
            for (failed, err) in &result.failures {
                writeln!(out, "error\t{}: {err}", failed.display())?;
                all_ok = false;
            }
        } else {
            match SceneFile::load(&path) {
                Ok(_) => writeln!(out, "ok\t{}", path.display())?,
                Err(err) => {
                    writeln!(out, "error\t{}: {err}", path.display())?;
                    all_ok = false;
                }
            }
        }
    }

    Ok(all_ok)
}

fn normalize(files: &[PathBuf], cfg: &CoreConfig, out: &mut impl Write) -> anyhow::Result<()> {
    for file in files {
        let path = cfg.resolve(file);
        let before = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut scene = load(&path)?;

        if scene.document().to_markdown()? == before {
            writeln!(out, "unchanged\t{}", path.display())?;
        } else {
            scene.write_in_place()?;
            writeln!(out, "normalized\t{}", path.display())?;
        }
    }
    Ok(())
}

fn new_scene(
    name: Option<&str>,
    dir: &Path,
    index: Option<usize>,
    cfg: &CoreConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let title = name.map(SceneTitle::new).transpose()?;
    let index = match index {
        Some(index) => index,
        None => next_index(dir)?,
    };

    let mut scene = SceneFile::create(dir.to_path_buf(), title, Some(index), cfg);
    if scene.path().exists() {
        bail!("{} already exists", scene.path().display());
    }
    scene.save(cfg)?;

    tracing::info!("created scene {} ({})", scene.title(), scene.id());
    writeln!(out, "{}", scene.path().display())?;
    Ok(())
}

/// First index after every indexed scene in `dir`.
fn next_index(dir: &Path) -> anyhow::Result<usize> {
    let result = scan_scenes(dir)?;
    Ok(result
        .scenes
        .iter()
        .filter_map(SceneFile::index)
        .max()
        .map_or(0, |index| index + 1))
}

fn save_and_report(
    scene: &mut SceneFile,
    cfg: &CoreConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let old_path = scene.path();
    if !scene.save(cfg)? {
        writeln!(out, "unchanged\t{}", old_path.display())?;
    } else if scene.path() != old_path {
        writeln!(out, "renamed\t{} -> {}", old_path.display(), scene.path().display())?;
    } else {
        writeln!(out, "updated\t{}", old_path.display())?;
    }
    Ok(())
}

fn renumber_folder(dir: &Path, cfg: &CoreConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let mut result = scan_scenes(dir)?;
    if !result.failures.is_empty() {
        for (path, err) in &result.failures {
            writeln!(out, "error\t{}: {err}", path.display())?;
        }
        bail!(
            "{} scene(s) in {} could not be loaded, not renumbering",
            result.failures.len(),
            dir.display()
        );
    }

    let moved = renumber(&mut result.scenes);
    let old_paths: Vec<PathBuf> = result.scenes.iter().map(SceneFile::path).collect();
    save_all(&mut result.scenes, cfg)?;
    for (scene, old_path) in result.scenes.iter().zip(&old_paths) {
        if scene.path() != *old_path {
            writeln!(out, "renamed\t{} -> {}", old_path.display(), scene.path().display())?;
        }
    }
    writeln!(out, "{moved} scene(s) moved")?;
    Ok(())
}
