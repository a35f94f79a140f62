use clap::Parser;
use searchbox::config::Config;
use searchbox::data::CandidateSet;
use searchbox::error::Result;
use searchbox::logging;
use searchbox::runtime::key_bindings::KeyBindings;
use searchbox::runtime::{Replay, Runtime, parse_script};
use searchbox::state::{Combobox, Selection};
use searchbox::terminal::Terminal;
use searchbox::ui::renderer::{Renderer, RendererConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Terminal search box: press the hotkey, type, pick a result.
#[derive(Parser, Debug)]
#[command(name = "searchbox")]
#[command(version)]
#[command(about = "Search combobox with debounced filtering", long_about = None)]
struct Cli {
    /// Config file (YAML, or JSON when the extension is .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Candidate list, one entry per line (default: built-in country names)
    #[arg(long)]
    candidates: Option<PathBuf>,

    /// Quiet period before the query is applied to the results
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Maximum number of results shown
    #[arg(long)]
    max_results: Option<usize>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Comma separated steps to run without a terminal, e.g. "ctrl+k,type:gh,wait:300,down"
    #[arg(long)]
    replay: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let _guard = logging::init(&config.log)?;

    let candidates = match config.candidates.as_deref() {
        Some(path) => CandidateSet::load(path)?,
        None => CandidateSet::builtin(),
    };
    info!(candidates = candidates.len(), "starting searchbox");

    let key_bindings = KeyBindings::with_hotkeys(&config.key_bindings()?);
    let renderer_config = RendererConfig {
        width: config.width,
        placeholder: config.placeholder.clone(),
        hotkey_hint: config.hotkeys.first().cloned().unwrap_or_default(),
    };
    let combobox = Combobox::mount(candidates, config.combobox_options());

    if let Some(script) = cli.replay.as_deref() {
        let steps = parse_script(script)?;
        let replay = Replay::new(combobox, key_bindings, Renderer::new(renderer_config));
        let outcome = replay.run(&steps);
        let json = serde_json::to_string_pretty(&outcome)?;
        println!("{json}");
        return Ok(());
    }

    let mut runtime = Runtime::with_key_bindings(combobox, Terminal::new()?, key_bindings)
        .with_renderer_config(renderer_config);
    runtime.run()?;

    match runtime.finish() {
        Some(Selection::Candidate { text }) => println!("{text}"),
        Some(Selection::Search { target, .. }) => println!("{target}"),
        None => {}
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(path) = cli.candidates.clone() {
        config.candidates = Some(path);
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    if let Some(max_results) = cli.max_results {
        config.max_results = max_results;
    }
    if let Some(path) = cli.log_file.clone() {
        config.log.file = Some(path);
    }

    config.validate()?;
    Ok(config)
}
