//! Built-in slash commands for the `psmith shell` REPL.
//!
//! - `/help` -- show available commands
//! - `/reset` -- drop the conversation back to its system turn
//! - `/mode raw` / `/mode engineer [submode]` -- switch between chat and refinement
//! - `/save [path]` -- write the transcript as JSONL
//! - `/exit` -- quit

use std::path::PathBuf;

use promptsmith_core::default_transcript_path;
use promptsmith_types::Mode;

use super::registry::{CommandOutcome, ShellContext, SlashCommand, SlashCommandRegistry};

/// Register all built-in slash commands into the given registry.
pub fn register_builtins(registry: &mut SlashCommandRegistry) {
    registry.register(Box::new(HelpCommand));
    registry.register(Box::new(ResetCommand));
    registry.register(Box::new(ModeCommand));
    registry.register(Box::new(SaveCommand));
    registry.register(Box::new(ExitCommand));
}

/// The command list printed at startup and by `/help`.
pub fn help_text(model: &str) -> String {
    let modes = Mode::names().join(",");
    format!(
        "Commands:\n\
         \x20 /mode raw                - normal assistant chat (default, uses {model})\n\
         \x20 /mode engineer [m]       - prompt-engineering (m in {{{modes}}}) on {model}\n\
         \x20 /reset                   - clear memory\n\
         \x20 /save [path]             - save transcript to JSONL\n\
         \x20 /help                    - show commands\n\
         \x20 /exit                    - quit\n"
    )
}

// ── /help ─────────────────────────────────────────────────────────────────

struct HelpCommand;

impl SlashCommand for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn execute(&self, _args: &str, ctx: &mut ShellContext) -> anyhow::Result<CommandOutcome> {
        Ok(CommandOutcome::say(help_text(&ctx.model)))
    }
}

// ── /reset ────────────────────────────────────────────────────────────────

struct ResetCommand;

impl SlashCommand for ResetCommand {
    fn name(&self) -> &str {
        "reset"
    }

    fn execute(&self, _args: &str, ctx: &mut ShellContext) -> anyhow::Result<CommandOutcome> {
        ctx.conversation.reset();
        Ok(CommandOutcome::say("[memory cleared]"))
    }
}

// ── /mode ─────────────────────────────────────────────────────────────────

/// `/mode raw` or `/mode engineer [submode]`.
///
/// An unrecognized submode is ignored and the current one kept.
struct ModeCommand;

impl SlashCommand for ModeCommand {
    fn name(&self) -> &str {
        "mode"
    }

    fn execute(&self, args: &str, ctx: &mut ShellContext) -> anyhow::Result<CommandOutcome> {
        let mut parts = args.split_whitespace();
        let reply = match parts.next() {
            None => "usage: /mode raw | /mode engineer [submode]".to_string(),
            Some("raw") => {
                ctx.engineer = false;
                format!("[mode=raw: {}]", ctx.model)
            }
            Some("engineer") => {
                ctx.engineer = true;
                if let Some(submode) = parts.next().and_then(|s| s.parse::<Mode>().ok()) {
                    ctx.submode = submode;
                }
                format!("[mode=engineer:{} on {}]", ctx.submode, ctx.model)
            }
            Some(_) => "unknown mode".to_string(),
        };
        Ok(CommandOutcome::Continue(reply))
    }
}

// ── /save ─────────────────────────────────────────────────────────────────

struct SaveCommand;

impl SlashCommand for SaveCommand {
    fn name(&self) -> &str {
        "save"
    }

    fn execute(&self, args: &str, ctx: &mut ShellContext) -> anyhow::Result<CommandOutcome> {
        let path = match args.split_whitespace().next() {
            Some(p) => PathBuf::from(p),
            None => default_transcript_path(&ctx.logs_dir),
        };
        ctx.conversation.save_jsonl(&path)?;
        Ok(CommandOutcome::say(format!("[saved → {}]", path.display())))
    }
}

// ── /exit ─────────────────────────────────────────────────────────────────

struct ExitCommand;

impl SlashCommand for ExitCommand {
    fn name(&self) -> &str {
        "exit"
    }

    fn execute(&self, _args: &str, _ctx: &mut ShellContext) -> anyhow::Result<CommandOutcome> {
        Ok(CommandOutcome::Exit)
    }
}
