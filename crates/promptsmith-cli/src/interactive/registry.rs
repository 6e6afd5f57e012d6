//! Slash command registry and dispatch.
//!
//! The [`SlashCommandRegistry`] holds a set of named [`SlashCommand`]
//! implementations and dispatches user input that starts with `/` to the
//! matching handler. Command names match case-insensitively.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = SlashCommandRegistry::new();
//! registry.register(Box::new(HelpCommand));
//! let result = registry.dispatch("/help", &mut ctx);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use promptsmith_core::ConversationState;
use promptsmith_types::Mode;

/// Mutable session state passed to slash commands.
pub struct ShellContext {
    /// History sent with every raw chat turn.
    pub conversation: ConversationState,

    /// Refine input instead of chatting.
    pub engineer: bool,

    /// Target mode while `engineer` is on.
    pub submode: Mode,

    /// Model both chat and engineer mode run on.
    pub model: String,

    /// Default directory for `/save`.
    pub logs_dir: PathBuf,
}

impl ShellContext {
    /// Fresh raw-mode context seeded with `system_prompt`.
    pub fn new(system_prompt: &str, model: impl Into<String>, logs_dir: PathBuf) -> Self {
        Self {
            conversation: ConversationState::new(system_prompt),
            engineer: false,
            submode: Mode::Chatgpt,
            model: model.into(),
            logs_dir,
        }
    }
}

/// What the REPL should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Print the text and keep reading.
    Continue(String),
    /// End the session.
    Exit,
}

impl CommandOutcome {
    pub fn say(text: impl Into<String>) -> Self {
        CommandOutcome::Continue(text.into())
    }
}

/// Trait for a slash command handler.
pub trait SlashCommand: Send + Sync {
    /// Command name without the leading `/`.
    fn name(&self) -> &str;

    /// Execute the command with the given arguments string.
    fn execute(&self, args: &str, ctx: &mut ShellContext) -> anyhow::Result<CommandOutcome>;
}

/// Registry of slash commands with dispatch.
pub struct SlashCommandRegistry {
    commands: HashMap<String, Box<dyn SlashCommand>>,
}

impl SlashCommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a slash command, replacing any with the same name.
    pub fn register(&mut self, cmd: Box<dyn SlashCommand>) {
        self.commands.insert(cmd.name().to_lowercase(), cmd);
    }

    /// Dispatch a line of input.
    ///
    /// The first word after `/` selects the command; the rest is passed as
    /// `args`. Returns `None` for non-command input or an unknown command.
    pub fn dispatch(
        &self,
        input: &str,
        ctx: &mut ShellContext,
    ) -> Option<anyhow::Result<CommandOutcome>> {
        let without_slash = input.trim().strip_prefix('/')?;
        let (name, args) = match without_slash.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (without_slash, ""),
        };

        let cmd = self.commands.get(&name.to_lowercase())?;
        Some(cmd.execute(args, ctx))
    }
}

impl Default for SlashCommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A test command that echoes its arguments.
    struct EchoCommand;

    impl SlashCommand for EchoCommand {
        fn name(&self) -> &str {
            "echo"
        }
        fn execute(&self, args: &str, _ctx: &mut ShellContext) -> anyhow::Result<CommandOutcome> {
            Ok(CommandOutcome::say(format!("echo: {args}")))
        }
    }

    struct FailCommand;

    impl SlashCommand for FailCommand {
        fn name(&self) -> &str {
            "fail"
        }
        fn execute(&self, _args: &str, _ctx: &mut ShellContext) -> anyhow::Result<CommandOutcome> {
            anyhow::bail!("intentional failure")
        }
    }

    fn test_ctx() -> ShellContext {
        ShellContext::new("sys", "test-model", PathBuf::from("logs"))
    }

    fn registry() -> SlashCommandRegistry {
        let mut reg = SlashCommandRegistry::new();
        reg.register(Box::new(EchoCommand));
        reg.register(Box::new(FailCommand));
        reg
    }

    #[test]
    fn context_starts_in_raw_chatgpt_mode() {
        let ctx = test_ctx();
        assert!(!ctx.engineer);
        assert_eq!(ctx.submode, Mode::Chatgpt);
        assert!(ctx.conversation.is_empty());
    }

    #[test]
    fn empty_registry_dispatches_nothing() {
        let mut ctx = test_ctx();
        assert!(SlashCommandRegistry::default().dispatch("/echo hi", &mut ctx).is_none());
    }

    #[test]
    fn dispatch_known_command_with_args() {
        let mut ctx = test_ctx();
        let out = registry().dispatch("/echo hello world", &mut ctx).unwrap().unwrap();
        assert_eq!(out, CommandOutcome::say("echo: hello world"));
    }

    #[test]
    fn dispatch_is_case_insensitive_and_trims() {
        let mut ctx = test_ctx();
        let out = registry().dispatch("  /ECHO trimmed  ", &mut ctx).unwrap().unwrap();
        assert_eq!(out, CommandOutcome::say("echo: trimmed"));
    }

    #[test]
    fn dispatch_unknown_or_plain_input_returns_none() {
        let mut ctx = test_ctx();
        assert!(registry().dispatch("/unknown", &mut ctx).is_none());
        assert!(registry().dispatch("regular message", &mut ctx).is_none());
    }

    #[test]
    fn dispatch_error_propagates() {
        let mut ctx = test_ctx();
        assert!(registry().dispatch("/fail", &mut ctx).unwrap().is_err());
    }

    #[test]
    fn register_replaces_same_name() {
        struct Shout;
        impl SlashCommand for Shout {
            fn name(&self) -> &str {
                "ECHO"
            }
            fn execute(&self, args: &str, _ctx: &mut ShellContext) -> anyhow::Result<CommandOutcome> {
                Ok(CommandOutcome::say(args.to_uppercase()))
            }
        }

        let mut reg = registry();
        reg.register(Box::new(Shout));
        let mut ctx = test_ctx();
        let out = reg.dispatch("/echo hi", &mut ctx).unwrap().unwrap();
        assert_eq!(out, CommandOutcome::say("HI"));
    }
}
