//! `psmith shell` -- interactive chat with a prompt-engineering mode.
//!
//! In raw mode each line is sent, with the conversation so far, to the
//! configured model and the reply streams back. In engineer mode each line
//! is refined on the same model instead. Slash commands are dispatched
//! through the [`SlashCommandRegistry`].
//!
//! # Examples
//!
//! ```text
//! psmith shell
//! you › salom
//! assistant › Salom! Qanday yordam bera olaman?
//! you › /mode engineer image
//! [mode=engineer:image on gpt-oss:20b]
//! you › /exit
//! ```

use std::io::Write;

use clap::Args;
use promptsmith_core::{FragmentSink, RefineOptions, Refiner, Silent};
use promptsmith_types::{AppConfig, ModelChoice, Profile};
use tokio::io::AsyncBufReadExt;
use tracing::debug;

use super::{build_refiner, load_config};
use crate::interactive::builtins::{help_text, register_builtins};
use crate::interactive::registry::{CommandOutcome, ShellContext, SlashCommandRegistry};

const USER_PROMPT: &str = "you › ";
const ASSISTANT_PROMPT: &str = "assistant › ";

/// Arguments for the `psmith shell` subcommand.
#[derive(Args)]
pub struct ShellArgs {
    /// Config file path (overrides discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Whether the REPL keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Forwards streamed fragments to the shell's output.
struct WriterSink<'a, W: Write + Send>(&'a mut W);

impl<W: Write + Send> FragmentSink for WriterSink<'_, W> {
    fn fragment(&mut self, text: &str) {
        let _ = self.0.write_all(text.as_bytes());
        let _ = self.0.flush();
    }
}

/// One shell session writing to `out`.
struct Shell<W: Write + Send> {
    refiner: Refiner,
    registry: SlashCommandRegistry,
    ctx: ShellContext,
    choice: ModelChoice,
    num_predict: u32,
    out: W,
}

impl<W: Write + Send> Shell<W> {
    fn new(refiner: Refiner, config: &AppConfig, out: W) -> Self {
        let mut registry = SlashCommandRegistry::new();
        register_builtins(&mut registry);

        let choice = ModelChoice::new(config.refiner.model.clone(), config.refiner.num_ctx);
        let ctx = ShellContext::new(
            &config.shell.system_prompt,
            choice.model.clone(),
            config.shell.logs_dir.clone(),
        );

        Self {
            refiner,
            registry,
            ctx,
            choice,
            num_predict: config.shell.num_predict,
            out,
        }
    }

    /// `[model: … | num_ctx: … | host: …]` followed by the help text.
    fn banner(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.out,
            "[model: {} | num_ctx: {} | host: {}]",
            self.choice.model,
            self.choice.num_ctx,
            self.refiner.adapter().backend().base_url()
        )?;
        writeln!(self.out, "{}", help_text(&self.ctx.model))?;
        Ok(())
    }

    fn prompt(&mut self) -> anyhow::Result<()> {
        write!(self.out, "{USER_PROMPT}")?;
        self.out.flush()?;
        Ok(())
    }

    fn goodbye(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "\nbye!")?;
        Ok(())
    }

    /// Handle one line of input.
    async fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        let input = line.trim();
        if input.is_empty() {
            return Ok(Flow::Continue);
        }

        if input.starts_with('/') {
            return self.handle_command(input);
        }

        if self.ctx.engineer {
            self.engineer(input).await?;
        } else {
            self.chat(input).await?;
        }
        Ok(Flow::Continue)
    }

    fn handle_command(&mut self, input: &str) -> anyhow::Result<Flow> {
        match self.registry.dispatch(input, &mut self.ctx) {
            Some(Ok(CommandOutcome::Continue(text))) => writeln!(self.out, "{text}")?,
            Some(Ok(CommandOutcome::Exit)) => return Ok(Flow::Exit),
            Some(Err(e)) => writeln!(self.out, "[error] {e:#}")?,
            None => writeln!(self.out, "unknown command; /help")?,
        }
        Ok(Flow::Continue)
    }

    /// Raw chat turn, streamed. Failures are shown inline and the history
    /// is left untouched.
    async fn chat(&mut self, input: &str) -> anyhow::Result<()> {
        write!(self.out, "{ASSISTANT_PROMPT}")?;
        self.out.flush()?;

        let turns = self.ctx.conversation.with_pending(input);
        let result = self
            .refiner
            .adapter()
            .chat_stream(
                &self.choice,
                &turns,
                self.num_predict,
                &mut WriterSink(&mut self.out),
            )
            .await;

        match result {
            Ok(reply) => {
                writeln!(self.out)?;
                self.ctx.conversation.push_exchange(input, reply);
            }
            Err(e) => writeln!(self.out, "\n[chat error] {e}")?,
        }
        Ok(())
    }

    /// Refine on the shell model: no cascade, buffered.
    async fn engineer(&mut self, input: &str) -> anyhow::Result<()> {
        // `max` resolves to the configured model, the one the shell chats on.
        let options = RefineOptions::for_profile(Profile::Max);
        debug!(submode = %self.ctx.submode, "engineer turn");

        match self
            .refiner
            .refine(input, self.ctx.submode, &options, &mut Silent)
            .await
        {
            Ok(outcome) => {
                writeln!(self.out, "\n{}\n", outcome.text)?;
                self.ctx.conversation.push_exchange(input, outcome.text);
            }
            Err(e) => writeln!(self.out, "\n[chat error] {e}")?,
        }
        Ok(())
    }
}

/// Run the shell until `/exit`, end of input or Ctrl-C.
pub async fn run(args: ShellArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref());
    let refiner = build_refiner(&config)?;

    // Keep the chat model resident; the detached preload is not awaited.
    let _ = refiner.adapter().preload_keepalive(&config.refiner.model);

    let mut shell = Shell::new(refiner, &config, std::io::stdout());
    shell.banner()?;

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        shell.prompt()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            shell.goodbye()?;
            break;
        };

        if shell.handle_line(&line).await? == Flow::Exit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use promptsmith_core::TemplateStore;
    use promptsmith_core::templates::{ModeSpec, ModesSpec, SystemPrompts};
    use promptsmith_llm::{
        ChatRequest, GenerateRequest, GenerationBackend, ProviderError, Result, StreamChunk,
    };
    use promptsmith_types::{Role, Turn};
    use tokio::sync::mpsc;

    use super::*;

    /// Chat replies with fixed fragments; generation echoes the model name.
    struct Scripted {
        chat_fails: bool,
        chats: Mutex<Vec<ChatRequest>>,
        generations: Mutex<Vec<GenerateRequest>>,
    }

    #[async_trait::async_trait]
    impl GenerationBackend for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }
        fn base_url(&self) -> &str {
            "http://localhost:11434"
        }
        async fn generate(&self, req: &GenerateRequest) -> Result<String> {
            self.generations.lock().unwrap().push(req.clone());
            Ok(format!("Maqsad: refined by {}", req.model))
        }
        async fn generate_stream(
            &self,
            _req: &GenerateRequest,
            _tx: mpsc::Sender<StreamChunk>,
        ) -> Result<()> {
            Ok(())
        }
        async fn chat_stream(&self, req: &ChatRequest, tx: mpsc::Sender<StreamChunk>) -> Result<()> {
            self.chats.lock().unwrap().push(req.clone());
            if self.chat_fails {
                return Err(ProviderError::RequestFailed("connection failed: refused".into()));
            }
            for text in ["Salom", "! Qanday ", "yordam?"] {
                let _ = tx.send(StreamChunk::TextDelta { text: text.into() }).await;
            }
            Ok(())
        }
        async fn preload(&self, _model: &str, _keep_alive: &str) -> Result<()> {
            Ok(())
        }
    }

    fn shell(chat_fails: bool) -> (Shell<Vec<u8>>, Arc<Scripted>) {
        let backend = Arc::new(Scripted {
            chat_fails,
            chats: Mutex::new(Vec::new()),
            generations: Mutex::new(Vec::new()),
        });
        let mut modes = ModesSpec::new();
        modes.insert(
            "chatgpt".into(),
            ModeSpec {
                sections: vec!["Maqsad / Цель".into()],
            },
        );
        let templates = TemplateStore::from_parts(
            SystemPrompts {
                uz: "uz".into(),
                ru: "ru".into(),
            },
            modes,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.refiner.num_ctx = 3072;
        let refiner = Refiner::new(
            Arc::new(config.refiner.clone()),
            Arc::new(templates),
            backend.clone(),
        );
        (Shell::new(refiner, &config, Vec::new()), backend)
    }

    fn output(shell: &Shell<Vec<u8>>) -> String {
        String::from_utf8(shell.out.clone()).unwrap()
    }

    #[tokio::test]
    async fn banner_names_model_context_and_host() {
        let (mut sh, _) = shell(false);
        sh.banner().unwrap();
        let out = output(&sh);
        assert!(out.starts_with("[model: gpt-oss:20b | num_ctx: 3072 | host: http://localhost:11434]\n"));
        assert!(out.contains("/mode engineer [m]"));
    }

    #[tokio::test]
    async fn raw_chat_streams_and_records_exchange() {
        let (mut sh, backend) = shell(false);

        assert_eq!(sh.handle_line("salom").await.unwrap(), Flow::Continue);

        assert_eq!(output(&sh), "assistant › Salom! Qanday yordam?\n");
        let turns = sh.ctx.conversation.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[2], Turn::assistant("Salom! Qanday yordam?"));

        let chats = backend.chats.lock().unwrap();
        assert_eq!(chats[0].model, "gpt-oss:20b");
        assert_eq!(chats[0].options.num_ctx, 3072);
        assert_eq!(chats[0].options.num_predict, Some(512));
        assert_eq!(chats[0].messages.last().unwrap().role, Role::User);
    }

    #[tokio::test]
    async fn chat_error_is_inline_and_session_continues() {
        let (mut sh, _) = shell(true);

        assert_eq!(sh.handle_line("salom").await.unwrap(), Flow::Continue);

        assert!(output(&sh).contains("\n[chat error] request failed: connection failed: refused\n"));
        assert!(sh.ctx.conversation.is_empty());
    }

    #[tokio::test]
    async fn engineer_mode_refines_on_shell_model() {
        let (mut sh, backend) = shell(false);
        sh.handle_line("/mode engineer image").await.unwrap();
        sh.handle_line("rasm chiz: qizil mashina").await.unwrap();

        let generations = backend.generations.lock().unwrap();
        assert_eq!(generations.len(), 1);
        assert_eq!(generations[0].model, "gpt-oss:20b");
        assert_eq!(generations[0].options.num_ctx, 3072);
        assert!(output(&sh).contains("\nMaqsad: refined by gpt-oss:20b\n\n"));
        assert_eq!(sh.ctx.conversation.len(), 3);
        assert!(backend.chats.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_command_and_exit() {
        let (mut sh, _) = shell(false);
        assert_eq!(sh.handle_line("/frobnicate").await.unwrap(), Flow::Continue);
        assert_eq!(output(&sh), "unknown command; /help\n");
        assert_eq!(sh.handle_line("/EXIT").await.unwrap(), Flow::Exit);
    }

    #[tokio::test]
    async fn blank_lines_are_ignored() {
        let (mut sh, backend) = shell(false);
        assert_eq!(sh.handle_line("   ").await.unwrap(), Flow::Continue);
        assert!(output(&sh).is_empty());
        assert!(backend.chats.lock().unwrap().is_empty());
    }
}
