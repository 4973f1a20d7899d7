//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{PressEvent, SelectionListener, TreeSelect};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::pick::pick_loop;
use crate::config::{global_config_dir, global_config_path, local_config_path, Settings};
use crate::domain::{KeyAccessor, NodePath, TreeNode};
use crate::infrastructure::traits::SkimSelector;
use crate::infrastructure::{load_document, InfraError};
use crate::render::TreeNodeConvert;

/// Prints engine notifications as they happen.
#[derive(Debug, Default)]
pub struct EchoListener {
    quiet: bool,
}

impl EchoListener {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl SelectionListener for EchoListener {
    fn on_parent_press(&mut self, node: &TreeNode) {
        if !self.quiet {
            let state = if node.expanded { "expanded" } else { "collapsed" };
            output::action(state, &node.data);
        }
    }

    fn on_child_press(&mut self, node: &TreeNode) {
        if !self.quiet {
            output::action("pressed", &node.data);
        }
    }

    fn on_check_box_press(&mut self, selection: &[&TreeNode]) {
        if !self.quiet {
            let labels = selection.iter().map(|node| node.data.to_string()).join(", ");
            output::action("selection", &format!("[{}]", labels));
        }
    }
}

pub type CliEngine = TreeSelect<KeyAccessor, EchoListener>;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { file }) => cmd_show(cli, file.as_deref()),
        Some(Commands::Run { file, json, events }) => cmd_run(cli, file.as_deref(), *json, events),
        Some(Commands::Pick { file }) => cmd_pick(cli, file.as_deref()),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see 'treeselect --help'".to_string(),
        )),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("resolve current directory", e).into()),
    }
}

/// Layered settings with the command line flags applied last.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = project_dir(cli)?;
    let mut settings = Settings::load(Some(dir.as_path()))?;

    if let Some(key) = &cli.title_key {
        settings.title_key = key.clone();
    }
    if let Some(key) = &cli.child_key {
        settings.child_key = key.clone();
    }
    if cli.no_auto_parents {
        settings.select.auto_select_parents = false;
    }
    if cli.no_auto_children {
        settings.select.auto_select_children = false;
    }
    if cli.auto_expand {
        settings.select.auto_expandable = true;
    }
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

fn open_engine(settings: &Settings, file: Option<&Path>, quiet: bool) -> CliResult<CliEngine> {
    let path = file
        .map(Path::to_path_buf)
        .or_else(|| settings.data_file.clone())
        .ok_or_else(|| {
            CliError::InvalidArgs("no tree document given and no data_file configured".to_string())
        })?;

    let document = load_document(&path)?;
    Ok(TreeSelect::from_document(
        &document,
        settings,
        EchoListener::new(quiet),
    )?)
}

fn print_forest(engine: &CliEngine) {
    for tree in engine.arena().to_tree_strings() {
        output::info(&tree);
    }
    output::header("Selected:");
    if engine.selection().is_empty() {
        output::detail("(none)");
    }
    for &id in engine.selection() {
        match NodePath::of(engine.arena(), id) {
            Some(path) => output::detail(&path),
            None => output::detail(&id),
        }
    }
}

#[instrument(skip(cli))]
fn cmd_show(cli: &Cli, file: Option<&Path>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let engine = open_engine(&settings, file, false)?;
    print_forest(&engine);
    Ok(())
}

/// Open the document and apply every event in order.
///
/// All events are parsed before the document is touched, so a malformed
/// event applies nothing.
#[instrument(skip(cli))]
pub fn run_events(
    cli: &Cli,
    file: Option<&Path>,
    events: &[String],
    quiet: bool,
) -> CliResult<CliEngine> {
    let events: Vec<PressEvent> = events
        .iter()
        .map(|e| e.parse::<PressEvent>())
        .collect::<Result<_, _>>()?;

    let settings = load_settings(cli)?;
    let mut engine = open_engine(&settings, file, quiet)?;
    for event in &events {
        let generation = engine.dispatch(event)?;
        debug!("{} -> generation {}", event, generation);
    }
    Ok(engine)
}

/// Exported records as pretty JSON.
pub fn render_records(engine: &CliEngine) -> CliResult<String> {
    serde_json::to_string_pretty(&engine.to_records())
        .map_err(|e| CliError::Usage(format!("serialize records: {e}")))
}

fn cmd_run(cli: &Cli, file: Option<&Path>, json: bool, events: &[String]) -> CliResult<()> {
    let engine = run_events(cli, file, events, json)?;
    if json {
        output::info(&render_records(&engine)?);
    } else {
        print_forest(&engine);
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_pick(cli: &Cli, file: Option<&Path>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let mut engine = open_engine(&settings, file, true)?;
    let applied = pick_loop(&mut engine, &SkimSelector)?;
    output::success(&format!("{} events applied", applied));
    print_forest(&engine);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let target = if *global {
                let dir = global_config_dir().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?;
                std::fs::create_dir_all(&dir)
                    .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
                dir.join("treeselect.toml")
            } else {
                local_config_path(&project_dir(cli)?)
            };
            if target.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    target.display()
                )));
            }
            std::fs::write(&target, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
            output::success(&format!("created {}", target.display()));
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", "(unavailable)"),
            }
            output::action("local", &local_config_path(&project_dir(cli)?).display());
        }
    }
    Ok(())
}
