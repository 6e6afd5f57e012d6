//! Slash-command framework for the `psmith shell` REPL.
//!
//! Provides a [`SlashCommandRegistry`](registry::SlashCommandRegistry) of
//! named commands plus a [`ShellContext`](registry::ShellContext) holding the
//! session state those commands read and modify.

pub mod builtins;
pub mod registry;
