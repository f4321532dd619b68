//! ox-login entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::{ActionObserver, DispatchResult, dispatch, translate_key, translate_paste};
use core_auth::AuthSession;
use core_config::load_from;
use core_events::{
    CHANNEL_SEND_FAILURES, CommandEvent, EVENT_CHANNEL_CAP, Event, EventSourceRegistry,
    InputEvent, KEYPRESS_TOTAL, PASTE_BYTES, PASTE_EVENTS, TickEventSource,
};
use core_model::AppModel;
use core_render::{RenderedFrame, build_frame, timing, writer::emit_frame};
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_NAME: &str = "ox-login.log";
const SOURCE_JOIN_TIMEOUT: Duration = Duration::from_millis(200);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ox-login", version, about = "Terminal login form")]
struct Args {
    /// Optional configuration file path (overrides discovery of `ox-login.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    model: AppModel<AuthSession>,
    config: core_config::Config,
    size: (u16, u16),
    terminal_guard: TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self, args: &Args) -> Result<RuntimeContext<'a>> {
        self.configure_logging()?;
        Self::install_panic_hook();

        info!(target: "runtime", "startup");
        let config = load_from(args.config.clone())?;
        let model = AppModel::new(AuthSession::new(), config.quiet_period());

        self.backend.set_title("ox-login")?;
        let mut guard = self.backend.enter_guard()?;
        let size = guard.backend().size();

        info!(
            target: "runtime.startup",
            config_override = args.config.is_some(),
            debounce_ms = config.effective_debounce_ms,
            tick_ms = config.effective_tick_ms,
            screen = model.screen().name(),
            width = size.0,
            height = size.1,
            "bootstrap_complete"
        );

        Ok(RuntimeContext {
            model,
            config,
            size,
            terminal_guard: guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Where composed frames go. The terminal in production, a recorder in tests.
trait FrameSink {
    fn present(&mut self, frame: &RenderedFrame) -> Result<()>;
}

struct TerminalSink<'a> {
    _guard: TerminalGuard<'a>,
}

impl FrameSink for TerminalSink<'_> {
    fn present(&mut self, frame: &RenderedFrame) -> Result<()> {
        emit_frame(frame).flush()
    }
}

/// Traces every dispatched action by label. Typed characters are never logged.
struct ActionTrace;

impl ActionObserver for ActionTrace {
    fn on_action(&self, action: &core_actions::Action) {
        trace!(target: "runtime.action", action = action.label(), "action");
    }
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CtrlC,
    CommandQuit,
    ActionQuit,
    ShutdownEvent,
    InputEnded,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::CommandQuit => "command_quit",
            ShutdownReason::ActionQuit => "action_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::InputEnded => "input_ended",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

/// Event handling state, independent of channels and the terminal.
struct Session {
    model: AppModel<AuthSession>,
    observers: Vec<Box<dyn ActionObserver>>,
    size: (u16, u16),
    dirty: bool,
}

impl Session {
    fn new(model: AppModel<AuthSession>, size: (u16, u16)) -> Self {
        Self {
            model,
            observers: vec![Box::new(ActionTrace)],
            size,
            dirty: true,
        }
    }

    /// Handle one event at `now`. Timers due at `now` are driven first so an
    /// event never observes stale validity.
    fn handle_event(&mut self, event: &Event, now: Instant) -> LoopControl {
        if self.model.tick(now) {
            self.dirty = true;
        }
        match event {
            Event::Input(input) => self.handle_input_event(input, now),
            Event::Command(CommandEvent::Quit) => LoopControl::Break {
                reason: ShutdownReason::CommandQuit,
            },
            Event::RenderRequested => {
                self.dirty = true;
                LoopControl::Continue
            }
            // Already driven above.
            Event::Tick => LoopControl::Continue,
            Event::Shutdown => LoopControl::Break {
                reason: ShutdownReason::ShutdownEvent,
            },
        }
    }

    /// Wake-up at the form's aggregation deadline.
    fn handle_deadline(&mut self, now: Instant) {
        if self.model.tick(now) {
            trace!(target: "runtime", "deadline_fired");
            self.dirty = true;
        }
    }

    fn handle_input_event(&mut self, input: &InputEvent, now: Instant) -> LoopControl {
        let action = match input {
            InputEvent::CtrlC => {
                info!(target: "runtime", "ctrl_c");
                return LoopControl::Break {
                    reason: ShutdownReason::CtrlC,
                };
            }
            InputEvent::Resize(w, h) => {
                self.size = (*w, *h);
                self.dirty = true;
                return LoopControl::Continue;
            }
            InputEvent::Key(key) => translate_key(self.model.screen(), key),
            InputEvent::Paste(text) => translate_paste(self.model.screen(), text),
        };
        let Some(action) = action else {
            return LoopControl::Continue;
        };
        let result = dispatch(action, &mut self.model, &self.observers, now);
        self.absorb(result)
    }

    fn absorb(&mut self, result: DispatchResult) -> LoopControl {
        if result.quit {
            return LoopControl::Break {
                reason: ShutdownReason::ActionQuit,
            };
        }
        if result.screen_changed {
            info!(target: "runtime", screen = self.model.screen().name(), "screen_changed");
        }
        self.dirty |= result.dirty;
        LoopControl::Continue
    }

    fn compose(&self) -> RenderedFrame {
        build_frame(&self.model, self.size.0, self.size.1)
    }
}

enum Wake {
    Event(Event),
    Deadline,
    InputEnded,
    ChannelClosed,
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending::<()>().await,
    }
}

async fn join_input(task: &mut Option<JoinHandle<()>>) {
    match task {
        Some(handle) => {
            if let Err(err) = handle.await {
                error!(target: "runtime", ?err, "input_task_join_failed");
            }
        }
        None => std::future::pending::<()>().await,
    }
}

struct LoginRuntime<S: FrameSink> {
    session: Session,
    sink: S,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
}

impl<S: FrameSink> LoginRuntime<S> {
    fn new(
        session: Session,
        sink: S,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_task: Option<JoinHandle<()>>,
        input_shutdown: Option<core_input::AsyncInputShutdown>,
        source_handles: Vec<JoinHandle<()>>,
    ) -> Self {
        Self {
            session,
            sink,
            rx,
            tx: Some(tx),
            source_handles,
            input_task,
            input_shutdown,
        }
    }

    async fn run(&mut self) -> Result<()> {
        self.render_if_dirty();

        let shutdown_reason = loop {
            let deadline = self.session.model.next_deadline();
            let wake = tokio::select! {
                maybe = self.rx.recv() => match maybe {
                    Some(event) => Wake::Event(event),
                    None => Wake::ChannelClosed,
                },
                _ = sleep_until_deadline(deadline) => Wake::Deadline,
                _ = join_input(&mut self.input_task) => Wake::InputEnded,
            };

            match wake {
                Wake::Event(event) => {
                    let control = self.session.handle_event(&event, Instant::now());
                    if let LoopControl::Break { reason } = control {
                        break reason;
                    }
                }
                Wake::Deadline => self.session.handle_deadline(Instant::now()),
                Wake::InputEnded => {
                    self.input_task = None;
                    warn!(target: "runtime", "input_task_ended");
                    break ShutdownReason::InputEnded;
                }
                Wake::ChannelClosed => break ShutdownReason::ChannelClosed,
            }
            self.render_if_dirty();
        };

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    fn render_if_dirty(&mut self) {
        if !self.session.dirty {
            return;
        }
        let start = Instant::now();
        let frame = self.session.compose();
        match self.sink.present(&frame) {
            Ok(()) => {
                self.session.dirty = false;
                timing::record_frame(start.elapsed().as_nanos() as u64);
            }
            Err(e) => error!(target: "render", ?e, "render_failed"),
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(tx) = self.tx.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "dropping_runtime_sender"
            );
            drop(tx);
        }

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(SOURCE_JOIN_TIMEOUT, handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_timeout"
                ),
            }
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match handle.await {
                Ok(_) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Err(err) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_cancelled"
                ),
                Err(err) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
            }
        }

        // Nothing pending may fire past this point.
        if let Some(login) = self.session.model.login_mut() {
            login.form.dispose();
        }

        info!(
            target: "runtime.shutdown",
            keypresses = KEYPRESS_TOTAL.load(Ordering::Relaxed),
            pastes = PASTE_EVENTS.load(Ordering::Relaxed),
            paste_bytes = PASTE_BYTES.load(Ordering::Relaxed),
            send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
            frames = timing::frames_emitted(),
            last_render_ns = timing::last_render_ns(),
            "telemetry"
        );
        log_shutdown_stage(reason, "complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let context = startup.run(&args)?;
    let RuntimeContext {
        model,
        config,
        size,
        terminal_guard,
    } = context;

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(config.tick_interval()));
    let source_handles = registry.spawn_all(&tx);

    let sink = TerminalSink {
        _guard: terminal_guard,
    };
    let mut runtime = LoginRuntime::new(
        Session::new(model, size),
        sink,
        tx,
        rx,
        Some(input_task),
        Some(input_shutdown),
        source_handles,
    );
    runtime
        .run()
        .instrument(tracing::debug_span!(target: "runtime", "event_loop"))
        .await
}

#[cfg(test)]
mod test_support;
