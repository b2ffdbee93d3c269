//! GeoTikZ 命令行程序
//!
//! ```text
//! geotikz render <工作区目录|场景.gtz> [-o 输出.tex] [选项]
//! geotikz demo [-o 输出.tex] [选项]
//! geotikz pack <工作区目录> <场景.gtz>
//! ```

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geotikz_codegen::{generate, GeneratorOptions};
use geotikz_core::prelude::*;
use geotikz_file::{archive, workspace, write_tikz, Scene};

const USAGE: &str = "\
Usage:
  geotikz render <WORKSPACE_DIR|SCENE.gtz> [-o OUTPUT] [OPTIONS]
  geotikz demo [-o OUTPUT] [OPTIONS]
  geotikz pack <WORKSPACE_DIR> <SCENE.gtz>

Options:
  -o, --output <FILE>   write TikZ to FILE instead of stdout
      --options <FILE>  generator options (JSON, merged over defaults)
      --fragment        emit only the tikzpicture environment
      --no-grid         omit grid, axes and ticks
      --no-labels       omit name labels
      --no-comments     omit per-object name comments
  -v, --verbose         debug logging";

#[derive(Debug)]
enum Command {
    Render(PathBuf),
    Demo,
    Pack(PathBuf, PathBuf),
}

#[derive(Debug)]
struct Args {
    command: Command,
    output: Option<PathBuf>,
    options_file: Option<PathBuf>,
    fragment: bool,
    no_grid: bool,
    no_labels: bool,
    no_comments: bool,
    verbose: bool,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut positional = Vec::new();
    let mut output = None;
    let mut options_file = None;
    let (mut fragment, mut no_grid, mut no_labels, mut no_comments, mut verbose) =
        (false, false, false, false, false);

    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                output = Some(PathBuf::from(iter.next().context("missing value for --output")?));
            }
            "--options" => {
                let value = iter.next().context("missing value for --options")?;
                options_file = Some(PathBuf::from(value));
            }
            "--fragment" => fragment = true,
            "--no-grid" => no_grid = true,
            "--no-labels" => no_labels = true,
            "--no-comments" => no_comments = true,
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'\n\n{USAGE}"),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        Some("render") => Command::Render(PathBuf::from(
            positional.next().context("render requires an input path")?,
        )),
        Some("demo") => Command::Demo,
        Some("pack") => {
            let dir = positional.next().context("pack requires a workspace directory")?;
            let target = positional.next().context("pack requires an archive path")?;
            Command::Pack(PathBuf::from(dir), PathBuf::from(target))
        }
        Some(other) => bail!("unknown command '{other}'\n\n{USAGE}"),
        None => bail!("{USAGE}"),
    };
    if let Some(extra) = positional.next() {
        bail!("unexpected argument '{extra}'");
    }

    Ok(Args {
        command,
        output,
        options_file,
        fragment,
        no_grid,
        no_labels,
        no_comments,
        verbose,
    })
}

impl Args {
    fn generator_options(&self) -> Result<GeneratorOptions> {
        let mut options = match &self.options_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read options file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid options file {}", path.display()))?
            }
            None => GeneratorOptions::default(),
        };
        if self.fragment {
            options.standalone = false;
        }
        if self.no_grid {
            options.coordinate_system = false;
        }
        if self.no_labels {
            options.name_labels = false;
        }
        if self.no_comments {
            options.name_comments = false;
        }
        Ok(options)
    }
}

/// 读取工作区目录或 `.gtz` 归档
fn load_scene(path: &Path) -> Result<(Vec<DrawingObject>, CanvasSettings)> {
    if path.is_dir() {
        let ws = workspace::load(path);
        Ok((ws.objects, ws.settings))
    } else {
        let scene = archive::load(path)
            .with_context(|| format!("failed to load scene archive {}", path.display()))?;
        Ok((scene.objects, scene.settings))
    }
}

/// 示例场景：三角形及其派生构造
fn build_demo_scene(store: &mut ObjectStore) {
    let a = store.add_object(ObjectDraft::point("A", 0.0, 0.0));
    let b = store.add_object(ObjectDraft::point("B", 200.0, 0.0));
    let c = store.add_object(ObjectDraft::point("C", 50.0, -150.0));

    let edges = [(a, b, "AB"), (b, c, "BC"), (c, a, "CA")];
    for (from, to, name) in edges {
        let (Some(p), Some(q)) = (store.get(from), store.get(to)) else {
            continue;
        };
        let draft = ObjectDraft::line(name, p.anchor(), q.anchor())
            .with_constraint(Constraint::new(ConstraintKind::StartPoint, from))
            .with_constraint(Constraint::new(ConstraintKind::EndPoint, to));
        store.add_object(draft);
    }

    store.construct_midpoint(a, b);
    if let Some(bisector) = store.construct_perpendicular_bisector(a, b) {
        let dashed = Style::default()
            .with_stroke(Color::rgb(0, 102, 204))
            .with_pattern(StrokePattern::Dashed);
        store.update_object(bisector, ObjectPatch::style(dashed));
    }
    store.construct_angle(b, a, c);

    store.add_object(
        ObjectDraft::circle("k", Point2::new(0.0, 0.0), 40.0)
            .with_style(Style::default().with_stroke(Color::RED).with_fill(Color::RED, 0.1))
            .with_constraint(Constraint::new(ConstraintKind::Center, c)),
    );
    store.propagate_constraints(c);

    info!("Created {} demo objects", store.len());
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => write_tikz(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{text}"),
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut store = ObjectStore::new();

    match &args.command {
        Command::Pack(dir, target) => {
            let ws = workspace::load(dir);
            let scene = Scene::new(ws.objects, ws.settings);
            archive::save(&scene, target)
                .with_context(|| format!("failed to write archive {}", target.display()))?;
            return Ok(());
        }
        Command::Render(input) => {
            let (objects, settings) = load_scene(input)?;
            store.load(objects, settings);
        }
        Command::Demo => build_demo_scene(&mut store),
    }

    let options = args.generator_options()?;
    let text = generate(store.objects(), &options);
    emit(&text, args.output.as_deref())
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    // 日志写到 stderr，stdout 留给生成的代码
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    info!("Starting GeoTikZ...");
    run(args)
}
