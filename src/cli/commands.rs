use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::sample::build_bookstore;
use crate::cli::args::{Cli, Commands, FormatArgs};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{NodeId, NodePath, XmlArena, XmlWriter};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Sample {
            output,
            snapshot,
            format,
        }) => _sample(&container, output.as_deref(), snapshot.as_deref(), format),
        Some(Commands::Render {
            snapshot,
            output,
            format,
        }) => _render(&container, snapshot, output.as_deref(), format),
        Some(Commands::Tree { snapshot }) => _tree(&container, snapshot),
        Some(Commands::Info { snapshot }) => _info(&container, snapshot),
        Some(Commands::Get {
            snapshot,
            path,
            output,
            format,
        }) => _get(
            &container,
            snapshot,
            &path.clone().unwrap_or_default(),
            output.as_deref(),
            format,
        ),
        Some(Commands::Remove {
            snapshot,
            path,
            output,
        }) => _remove(&container, snapshot, path, output.as_deref()),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn writer_for(container: &ServiceContainer, format: &FormatArgs) -> XmlWriter {
    format.apply(container.settings.writer())
}

/// Writes to `output` if given, otherwise to stdout.
fn emit(
    container: &ServiceContainer,
    arena: &XmlArena,
    root: NodeId,
    output: Option<&Path>,
    writer: &XmlWriter,
) -> CliResult<()> {
    match output {
        Some(path) => {
            container.export.write_xml(arena, root, path, writer)?;
            output::action("Written", &path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writer.write(arena.node(root)?, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _sample(
    container: &ServiceContainer,
    output: Option<&Path>,
    snapshot: Option<&Path>,
    format: &FormatArgs,
) -> CliResult<()> {
    let mut arena = XmlArena::new();
    let root = build_bookstore(&mut arena)?;
    if let Some(path) = snapshot {
        container.snapshots.save(&arena, root, path)?;
        output::action("Snapshot", &path.display());
    }
    emit(container, &arena, root, output, &writer_for(container, format))
}

#[instrument(skip(container))]
fn _render(
    container: &ServiceContainer,
    snapshot: &Path,
    output: Option<&Path>,
    format: &FormatArgs,
) -> CliResult<()> {
    let (arena, root) = container.snapshots.load(snapshot)?;
    emit(container, &arena, root, output, &writer_for(container, format))
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, snapshot: &Path) -> CliResult<()> {
    let (arena, root) = container.snapshots.load(snapshot)?;
    output::info(&arena.node(root)?.to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn _info(container: &ServiceContainer, snapshot: &Path) -> CliResult<()> {
    let (arena, root) = container.snapshots.load(snapshot)?;
    let node = arena.node(root)?;
    let max_depth = node.descendants().map(|n| n.depth()).max().unwrap_or(0);
    let leaves = node.descendants().filter(|n| !n.has_children()).count();

    output::header(&snapshot.display());
    output::detail("root", &node.make_xml_tags().open);
    output::detail("elements", &node.size());
    output::detail("children", &node.no_children());
    output::detail("leaves", &leaves);
    output::detail("max depth", &max_depth);
    Ok(())
}

#[instrument(skip(container))]
fn _get(
    container: &ServiceContainer,
    snapshot: &Path,
    path: &NodePath,
    output: Option<&Path>,
    format: &FormatArgs,
) -> CliResult<()> {
    let (arena, root) = container.snapshots.load(snapshot)?;
    let id = arena.get_from_path(root, path)?;
    emit(container, &arena, id, output, &writer_for(container, format))
}

#[instrument(skip(container))]
fn _remove(
    container: &ServiceContainer,
    snapshot: &Path,
    path: &NodePath,
    output: Option<&Path>,
) -> CliResult<()> {
    let (mut arena, root) = container.snapshots.load(snapshot)?;
    let removed = arena.remove_from_path(root, path)?;
    let target = output.unwrap_or(snapshot);
    container.snapshots.save(&arena, root, target)?;
    output::action(
        "Removed",
        &format!("{} element(s) at {}, {} left", removed, path, arena.size(root)?),
    );
    Ok(())
}
