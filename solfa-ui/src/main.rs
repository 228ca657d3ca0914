mod action;
mod dispatch;
mod panes;
mod state;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use solfa_audio::AudioPlayer;
use solfa_core::{Config, Lcg, Preferences};
use solfa_types::{Difficulty, Direction, Notation, VoiceId};

use action::Action;
use dispatch::LocalDispatcher;
use panes::{QuizPane, SetupPane};
use state::AppState;
use ui::{AppEvent, Frame, InputSource, PaneManager, RatatuiBackend, RenderBuf};

/// Command-line overrides; anything unset falls back to config and preferences.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    verbose: bool,
    international: bool,
    voice: Option<String>,
    samples: Option<PathBuf>,
    direction: Option<Direction>,
    difficulty: Option<Difficulty>,
}

impl CliArgs {
    fn parse(args: &[String]) -> Self {
        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1).cloned())
        };
        Self {
            verbose: args.iter().any(|a| a == "--verbose" || a == "-v"),
            international: args.iter().any(|a| a == "--international"),
            voice: value_of("--voice"),
            samples: value_of("--samples").map(PathBuf::from),
            direction: value_of("--mode").as_deref().and_then(Direction::parse),
            difficulty: value_of("--difficulty").as_deref().and_then(Difficulty::parse),
        }
    }
}

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("solfa")
        .join("solfa.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(_) => match File::create(std::env::temp_dir().join("solfa.log")) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("solfa: logging disabled: {}", e);
                return;
            }
        },
    };

    if WriteLogger::init(log_level, simplelog::Config::default(), log_file).is_err() {
        eprintln!("solfa: logger already initialized");
        return;
    }

    log::info!("solfa starting (log level: {:?})", log_level);
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = CliArgs::parse(&args);
    init_logging(cli.verbose);

    let mut dispatcher = build_dispatcher(&cli);

    let mut backend = RatatuiBackend::new()?;
    backend.start()?;

    let result = run(&mut backend, &mut dispatcher);

    backend.stop()?;
    result
}

fn build_dispatcher(cli: &CliArgs) -> LocalDispatcher {
    let config = Config::load();
    let audio = config.audio();

    let notation = if cli.international {
        Notation::International
    } else {
        Preferences::load()
            .map(|p| p.notation())
            .unwrap_or_else(|| Notation::from_alternate(config.default_international()))
    };
    let voice = cli.voice.clone().map(VoiceId::new).unwrap_or(audio.voice);
    let samples_dir = solfa_audio::paths::samples_dir(cli.samples.as_deref(), audio.samples_dir.as_deref());
    log::info!(
        "voice {}, samples {:?}, synth fallback {}",
        voice,
        samples_dir,
        audio.synth_fallback
    );

    let player = AudioPlayer::with_default_output(voice.clone(), samples_dir, audio.synth_fallback);

    let mut state = AppState::new(notation, voice);
    state.direction = cli.direction.or(config.direction());
    state.difficulty = cli.difficulty.or(config.difficulty());

    let preferences_path = solfa_core::config::config_dir().map(|d| d.join("preferences.toml"));
    LocalDispatcher::new(
        state,
        player,
        Box::new(Lcg::from_time()),
        preferences_path,
        audio.note_duration,
    )
}

fn run(backend: &mut RatatuiBackend, dispatcher: &mut LocalDispatcher) -> std::io::Result<()> {
    let mut panes = PaneManager::new(Box::new(SetupPane::new()));
    panes.add_pane(Box::new(QuizPane::new()));

    loop {
        if let Some(app_event) = backend.poll_event(Duration::from_millis(16)) {
            let action = match app_event {
                AppEvent::Resize => Action::None,
                AppEvent::Key(event) => panes.active_mut().handle_input(&event, dispatcher.state()),
            };
            let result = dispatcher.dispatch(&action, Instant::now());
            if result.quit {
                break;
            }
            panes.process_nav_intents(&result.nav);
        }

        dispatcher.tick(Instant::now());

        let mut frame = backend.begin_frame()?;
        let area = frame.area();
        let mut rbuf = RenderBuf::new(frame.buffer_mut());
        let hints = panes.active().key_hints();
        if let Some(inner) = Frame::render_buf(area, &mut rbuf, dispatcher.state(), hints) {
            panes.render(inner, &mut rbuf, dispatcher.state());
        }
        backend.end_frame(frame)?;
    }

    log::info!("solfa exiting");
    Ok(())
}
