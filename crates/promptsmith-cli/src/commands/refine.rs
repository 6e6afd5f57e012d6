//! `psmith refine` -- one-shot prompt refinement.
//!
//! Prints a header describing the resolved model, a rule, then the refined
//! prompt. Output streams token by token unless `--no-stream` is given.
//!
//! # Examples
//!
//! ```text
//! psmith refine "rasm chiz: qizil mashina" --mode image
//! psmith refine "сделай промпт для бота" --profile balanced --cascade
//! psmith refine "kod yoz: json parser" --mode coding --model phi3:mini --num-ctx 1024
//! ```

use std::io::Write;

use clap::Args;
use promptsmith_core::{FragmentSink, RefineOptions, Refiner};
use promptsmith_types::{Mode, ModelChoice, Profile};

use super::{build_refiner, load_config};

/// Width of the rule under the header.
const RULE_WIDTH: usize = 80;

/// Arguments for the `psmith refine` subcommand.
#[derive(Args)]
pub struct RefineArgs {
    /// The raw request to refine.
    pub prompt: String,

    /// Target mode: coding, image, video or chatgpt.
    #[arg(long, default_value = "chatgpt")]
    pub mode: Mode,

    /// Profile: speed, balanced or max.
    #[arg(long, default_value = "speed")]
    pub profile: Profile,

    /// Try the fast model, fall back to the configured model if quality is low.
    #[arg(long)]
    pub cascade: bool,

    /// Model to use (overrides the profile).
    #[arg(long)]
    pub model: Option<String>,

    /// Context window (overrides the profile).
    #[arg(long)]
    pub num_ctx: Option<u32>,

    /// Print the result at once instead of streaming it.
    #[arg(long)]
    pub no_stream: bool,

    /// Config file path (overrides discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

impl RefineArgs {
    fn options(&self) -> RefineOptions {
        RefineOptions {
            profile: self.profile,
            cascade: self.cascade,
            stream: !self.no_stream,
            model_override: self.model.clone(),
            num_ctx_override: self.num_ctx,
        }
    }
}

/// Writes fragments to stdout as they arrive.
struct StdoutSink;

impl FragmentSink for StdoutSink {
    fn fragment(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn fallback(&mut self, choice: &ModelChoice) {
        println!("\n{}\n", fallback_notice(choice));
    }
}

/// Buffered runs only announce the fallback.
struct NoticeSink;

impl FragmentSink for NoticeSink {
    fn fragment(&mut self, _text: &str) {}

    fn fallback(&mut self, choice: &ModelChoice) {
        println!("\n{}\n", fallback_notice(choice));
    }
}

/// Run the refine command.
pub async fn run(args: RefineArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref());
    let refiner = build_refiner(&config)?;
    let options = args.options();

    println!("{}", header(&refiner, &options));
    println!("{}", "=".repeat(RULE_WIDTH));

    if options.stream {
        refiner
            .refine(&args.prompt, args.mode, &options, &mut StdoutSink)
            .await?;
        println!("\n");
    } else {
        let outcome = refiner
            .refine(&args.prompt, args.mode, &options, &mut NoticeSink)
            .await?;
        println!("{}", outcome.text);
    }

    Ok(())
}

/// `[Model: … | num_ctx: … | host: … | profile: … | cascade: …]`
fn header(refiner: &Refiner, options: &RefineOptions) -> String {
    let choice = refiner.resolve_choice(options);
    format!(
        "[Model: {} | num_ctx: {} | host: {} | profile: {} | cascade: {}]",
        choice.model,
        choice.num_ctx,
        refiner.adapter().backend().base_url(),
        options.profile,
        options.cascade
    )
}

fn fallback_notice(choice: &ModelChoice) -> String {
    format!("[Auto-fallback → {} for higher quality]", choice.model)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use promptsmith_core::TemplateStore;
    use promptsmith_core::templates::{ModeSpec, ModesSpec, SystemPrompts};
    use promptsmith_llm::OllamaBackend;
    use promptsmith_types::RefinerConfig;

    use super::*;

    fn args(extra: &[&str]) -> RefineArgs {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: RefineArgs,
        }

        let mut argv = vec!["refine", "salom"];
        argv.extend_from_slice(extra);
        Wrapper::try_parse_from(argv).unwrap().args
    }

    fn refiner() -> Refiner {
        let mut modes = ModesSpec::new();
        modes.insert(
            "chatgpt".into(),
            ModeSpec {
                sections: vec!["Maqsad".into()],
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
        Refiner::new(
            Arc::new(RefinerConfig::default()),
            Arc::new(templates),
            Arc::new(OllamaBackend::from_base_url(Some("gpu-box:11434"))),
        )
    }

    #[test]
    fn defaults_stream_on_speed_without_cascade() {
        let a = args(&[]);
        assert_eq!(a.mode, Mode::Chatgpt);
        let opts = a.options();
        assert_eq!(opts.profile, Profile::Speed);
        assert!(opts.stream);
        assert!(!opts.cascade);
        assert!(opts.model_override.is_none());
    }

    #[test]
    fn no_stream_and_overrides_flow_into_options() {
        let opts = args(&["--no-stream", "--model", "phi3:mini", "--num-ctx", "1024"]).options();
        assert!(!opts.stream);
        assert_eq!(opts.model_override.as_deref(), Some("phi3:mini"));
        assert_eq!(opts.num_ctx_override, Some(1024));
    }

    #[test]
    fn header_shows_resolved_choice_and_host() {
        let opts = args(&["--profile", "balanced", "--cascade"]).options();
        assert_eq!(
            header(&refiner(), &opts),
            "[Model: mistral:latest | num_ctx: 4096 | host: http://gpu-box:11434 | profile: balanced | cascade: true]"
        );
    }

    #[test]
    fn header_reflects_overrides() {
        let opts = args(&["--model", "phi3:mini"]).options();
        assert!(header(&refiner(), &opts).starts_with("[Model: phi3:mini | num_ctx: 2048 |"));
    }

    #[test]
    fn fallback_notice_names_model() {
        assert_eq!(
            fallback_notice(&ModelChoice::new("gpt-oss:20b", 2048)),
            "[Auto-fallback → gpt-oss:20b for higher quality]"
        );
    }
}
