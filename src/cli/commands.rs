//! Command dispatch: one gesture per invocation against a menu document.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{DropTarget, MenuDocumentService, MenuEditor};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, SetArgs, TargetArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{DomainError, MenuTree, MoveKind, NodePatch, TreeDisplay};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Resolved invocation context.
struct Context {
    container: ServiceContainer,
    project_dir: PathBuf,
    file: PathBuf,
}

impl Context {
    fn load(cli: &Cli) -> CliResult<Self> {
        let project_dir = match &cli.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
        };
        let settings = Settings::load(Some(&project_dir))?;
        let file = cli
            .file
            .clone()
            .unwrap_or_else(|| settings.menu_file.clone());
        let file = if file.is_relative() {
            project_dir.join(file)
        } else {
            file
        };
        debug!("project_dir={}, file={}", project_dir.display(), file.display());
        Ok(Self {
            container: ServiceContainer::new(settings),
            project_dir,
            file,
        })
    }

    fn editor(&self) -> CliResult<MenuEditor> {
        Ok(self.container.open_editor(&self.file)?)
    }

    fn save(&self, editor: &MenuEditor) -> CliResult<()> {
        Ok(self.container.save_editor(&self.file, editor)?)
    }
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let ctx = Context::load(cli)?;
    match command {
        Commands::Init { force } => cmd_init(&ctx, *force),
        Commands::Show => cmd_show(&ctx),
        Commands::List { json } => cmd_list(&ctx, *json),
        Commands::Import { input, flat } => cmd_import(&ctx, input, *flat),
        Commands::Export { output, compact } => cmd_export(&ctx, output.as_deref(), *compact),
        Commands::Locate { id } => cmd_locate(&ctx, id),
        Commands::Add {
            template,
            target,
            index,
            label,
            url,
        } => cmd_add(&ctx, template, &drop_target(target, *index), label, url),
        Commands::Move { id, target, index } => cmd_move(&ctx, id, &drop_target(target, *index)),
        Commands::Remove { id } => cmd_remove(&ctx, id),
        Commands::Set(args) => cmd_set(&ctx, args),
        Commands::Toggle { id } => cmd_toggle(&ctx, id),
        Commands::Duplicate { id } => cmd_duplicate(&ctx, id),
        Commands::Library { search } => cmd_library(&ctx, search.as_deref()),
        Commands::Config { command } => cmd_config(&ctx, command),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Translate position flags into a drop target. No flag means root level.
pub fn drop_target(target: &TargetArgs, index: Option<usize>) -> DropTarget {
    if let Some(parent_id) = &target.into {
        DropTarget::Into {
            parent_id: parent_id.clone(),
            index,
        }
    } else if let Some(over_id) = &target.over {
        DropTarget::Adjacent {
            over_id: over_id.clone(),
        }
    } else {
        DropTarget::Root { index }
    }
}

/// Build a patch from `set` flags. Empty strings clear optional fields.
pub fn patch_from_args(args: &SetArgs) -> NodePatch {
    fn clearable(value: &Option<String>) -> Option<Option<String>> {
        value
            .as_ref()
            .map(|v| if v.is_empty() { None } else { Some(v.clone()) })
    }
    NodePatch {
        label: args.label.clone(),
        url: clearable(&args.url),
        icon: clearable(&args.icon),
        target: args.target.map(Some),
        hidden: args.hidden,
        description: clearable(&args.description),
        classes: clearable(&args.classes),
    }
}

#[instrument(skip(ctx))]
fn cmd_init(ctx: &Context, force: bool) -> CliResult<()> {
    if ctx.container.fs.exists(&ctx.file) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            ctx.file.display()
        )));
    }
    ctx.container
        .documents
        .save(&ctx.file, &MenuTree::default(), ctx.container.settings.pretty)?;
    output::success(&format!("Created {}", ctx.file.display()));
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_show(ctx: &Context) -> CliResult<()> {
    let editor = ctx.editor()?;
    output::info(&editor.tree().to_display_tree());
    output::detail(&format!("{} items", editor.node_count()));
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_list(ctx: &Context, json: bool) -> CliResult<()> {
    let editor = ctx.editor()?;
    let rows = editor.flat_items()?;
    if json {
        let rendered = serde_json::to_string_pretty(&rows).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize rows".into(),
                source: Box::new(e),
            }
        })?;
        output::info(&rendered);
        return Ok(());
    }
    for row in rows {
        output::info(&format!(
            "{}{} [{}] id={} parent={} depth={} index={}",
            "  ".repeat(row.depth),
            row.item.label,
            row.item.item_type,
            row.item.id,
            row.parent_id.as_deref().unwrap_or("-"),
            row.depth,
            row.index
        ));
    }
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_import(ctx: &Context, input: &Path, flat: bool) -> CliResult<()> {
    let input = if input.is_relative() {
        ctx.project_dir.join(input)
    } else {
        input.to_path_buf()
    };
    let settings = &ctx.container.settings;
    let tree = ctx
        .container
        .documents
        .import(&input, flat, settings.max_depth)?;
    ctx.container
        .documents
        .save(&ctx.file, &tree, settings.pretty)?;
    output::success(&format!(
        "Imported {} into {}",
        input.display(),
        ctx.file.display()
    ));
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_export(ctx: &Context, output_path: Option<&Path>, compact: bool) -> CliResult<()> {
    let editor = ctx.editor()?;
    let pretty = ctx.container.settings.pretty && !compact;
    match output_path {
        Some(path) => {
            ctx.container.documents.save(path, editor.tree(), pretty)?;
            output::success(&format!("Exported to {}", path.display()));
        }
        None => {
            let json = MenuDocumentService::export(editor.tree(), pretty).map_err(|e| {
                ApplicationError::OperationFailed {
                    context: "serialize menu".into(),
                    source: Box::new(e),
                }
            })?;
            output::info(&json);
        }
    }
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_locate(ctx: &Context, id: &str) -> CliResult<()> {
    let editor = ctx.editor()?;
    let loc = editor
        .locate(id)
        .ok_or_else(|| ApplicationError::from(DomainError::NodeNotFound(id.to_string())))?;
    output::header(&format!("{} [{}]", loc.node.label(), loc.node.item_type()));
    output::detail(&format!("id:     {}", loc.node.id()));
    output::detail(&format!("parent: {}", loc.parent_id().unwrap_or("(root)")));
    output::detail(&format!("index:  {}", loc.index));
    output::detail(&format!("depth:  {}", loc.depth()));
    let path: Vec<String> = loc.path.iter().map(usize::to_string).collect();
    output::detail(&format!("path:   {}", path.join(".")));
    output::detail(&format!("trail:  {}", editor.breadcrumb(id)?.join(" > ")));
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_add(
    ctx: &Context,
    key: &str,
    target: &DropTarget,
    label: &Option<String>,
    url: &Option<String>,
) -> CliResult<()> {
    let mut editor = ctx.editor()?;
    let mut template = editor
        .library()
        .template(key)
        .ok_or_else(|| ApplicationError::UnknownTemplate(key.to_string()))?;
    if let Some(label) = label {
        template.label = label.clone();
    }
    if let Some(url) = url {
        template.url = Some(url.clone());
    }
    let id = editor.drop_new(&template, target)?;
    ctx.save(&editor)?;
    output::action("Added", &format!("{} ({})", template.label, id));
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_move(ctx: &Context, id: &str, target: &DropTarget) -> CliResult<()> {
    let mut editor = ctx.editor()?;
    match editor.move_item(id, target)? {
        MoveKind::Unchanged => output::warning(&format!("{id}: nothing moved")),
        kind => {
            ctx.save(&editor)?;
            let verb = if kind == MoveKind::Reorder { "Reordered" } else { "Moved" };
            output::action(verb, &id);
        }
    }
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_remove(ctx: &Context, id: &str) -> CliResult<()> {
    let mut editor = ctx.editor()?;
    if !editor.remove(id) {
        output::warning(&format!("{id}: not found, nothing removed"));
        return Ok(());
    }
    ctx.save(&editor)?;
    output::action("Removed", &id);
    Ok(())
}

#[instrument(skip(ctx, args), fields(id = %args.id))]
fn cmd_set(ctx: &Context, args: &SetArgs) -> CliResult<()> {
    let patch = patch_from_args(args);
    if patch.is_empty() {
        return Err(CliError::InvalidArgs("nothing to set".into()));
    }
    let mut editor = ctx.editor()?;
    if !editor.update(&args.id, &patch) {
        return Err(ApplicationError::from(DomainError::NodeNotFound(args.id.clone())).into());
    }
    ctx.save(&editor)?;
    output::action("Updated", &args.id);
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_toggle(ctx: &Context, id: &str) -> CliResult<()> {
    let mut editor = ctx.editor()?;
    let hidden = editor.toggle_hidden(id)?;
    ctx.save(&editor)?;
    output::action(if hidden { "Hidden" } else { "Visible" }, &id);
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_duplicate(ctx: &Context, id: &str) -> CliResult<()> {
    let mut editor = ctx.editor()?;
    let copy = editor.duplicate(id)?;
    ctx.save(&editor)?;
    output::action("Duplicated", &format!("{id} -> {copy}"));
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_library(ctx: &Context, search: Option<&str>) -> CliResult<()> {
    let library = ctx.container.library()?;
    output::header("Custom items");
    for t in library.custom() {
        output::detail(&format!(
            "{:<12} {} [{}]",
            t.key, t.label, t.item_type
        ));
    }
    output::header("Pages");
    let pages = library.search_pages(search.unwrap_or(""));
    if pages.is_empty() {
        output::detail("(none)");
    }
    for page in pages {
        output::detail(&format!(
            "{:<12} {} {}",
            format!("page:{}", page.id),
            page.title,
            page.path
        ));
    }
    Ok(())
}

#[instrument(skip(ctx))]
fn cmd_config(ctx: &Context, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&ctx.container.settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: (no config directory)"),
            }
            output::detail(&format!(
                "local:  {}",
                local_config_path(&ctx.project_dir).display()
            ));
            output::detail(&format!("menu:   {}", ctx.file.display()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_position_flags_when_resolving_then_root() {
        let target = drop_target(&TargetArgs::default(), Some(2));
        assert_eq!(target, DropTarget::Root { index: Some(2) });
    }

    #[test]
    fn given_into_flag_when_resolving_then_nested() {
        let args = TargetArgs {
            into: Some("2".into()),
            ..Default::default()
        };
        assert_eq!(
            drop_target(&args, None),
            DropTarget::Into {
                parent_id: "2".into(),
                index: None
            }
        );
    }

    #[test]
    fn given_empty_strings_when_building_patch_then_fields_are_cleared() {
        let args = SetArgs {
            id: "1".into(),
            label: None,
            url: Some(String::new()),
            icon: Some("Home".into()),
            target: None,
            hidden: Some(true),
            description: None,
            classes: None,
        };
        let patch = patch_from_args(&args);
        assert_eq!(patch.url, Some(None));
        assert_eq!(patch.icon, Some(Some("Home".into())));
        assert_eq!(patch.hidden, Some(true));
        assert!(patch.label.is_none());
    }
}
