use crate::keys::{is_ctrl_c, map_key_event};
use crate::log_paste;
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, Event, InputEvent, KEYPRESS_TOTAL,
    PASTE_BYTES, PASTE_EVENTS,
};
use crossterm::event::{Event as CEvent, EventStream, KeyEvent as CKeyEvent};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{Instrument, info, trace, warn};

/// Handle used by the runtime to stop the input task without waiting for the
/// next terminal event.
#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let task = AsyncEventStreamTask::new(sender, EventStream::new(), listener);
    let handle = task::spawn(
        task.run()
            .instrument(tracing::debug_span!(target: "input.thread", "input_async_task")),
    );
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    Running,
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Running => "running",
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }

    fn counter(&self) -> Option<&'static std::sync::atomic::AtomicU64> {
        match self {
            ExitReason::Running => None,
            ExitReason::ShutdownSignal => Some(&ASYNC_INPUT_STOP_SIGNAL),
            ExitReason::ChannelClosed => Some(&ASYNC_INPUT_STOP_CHANNEL),
            ExitReason::StreamEnded => Some(&ASYNC_INPUT_STOP_STREAM),
            ExitReason::StreamError => Some(&ASYNC_INPUT_STOP_ERROR),
        }
    }
}

/// Pumps a terminal event stream into the runtime channel. Generic over the
/// stream so tests can feed scripted events.
struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
    exit_reason: ExitReason,
    stream_error: Option<io::ErrorKind>,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
            exit_reason: ExitReason::Running,
            stream_error: None,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);
        self.exit_reason = ExitReason::StreamEnded;
        loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => {
                    self.exit_reason = ExitReason::ShutdownSignal;
                    break;
                }
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                break;
            };

            let keep_going = match result {
                Ok(CEvent::Key(key)) => self.handle_key_event(key).await,
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    self.send_event(Event::Input(InputEvent::Resize(w, h)))
                        .await
                }
                Ok(CEvent::Paste(data)) => self.handle_paste(data).await,
                // Focus and mouse reports are not used by the login shell.
                Ok(_) => true,
                Err(err) => {
                    self.exit_reason = ExitReason::StreamError;
                    self.stream_error = Some(err.kind());
                    false
                }
            };
            if !keep_going {
                break;
            }
        }

        let reason = self.exit_reason;
        if let Some(counter) = reason.counter() {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        if matches!(reason, ExitReason::StreamError) {
            warn!(
                target: "input.thread",
                error_kind = ?self.stream_error,
                "async_input_task_stream_error"
            );
        }
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    async fn handle_key_event(&mut self, key: CKeyEvent) -> bool {
        if is_ctrl_c(&key) {
            return self.send_event(Event::Input(InputEvent::CtrlC)).await;
        }
        let Some(mapped) = map_key_event(&key) else {
            return true;
        };
        // Only the key kind and modifiers are traced; characters may be password input.
        trace!(
            target: "input.event",
            kind = "keypress",
            is_char = matches!(mapped.code, core_events::KeyCode::Char(_)),
            mods = ?mapped.mods
        );
        let sent = self.send_event(Event::Input(InputEvent::Key(mapped))).await;
        if sent {
            KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed);
        }
        sent
    }

    async fn handle_paste(&mut self, data: String) -> bool {
        log_paste(&data);
        let len = data.len() as u64;
        let sent = self.send_event(Event::Input(InputEvent::Paste(data))).await;
        if sent {
            PASTE_EVENTS.fetch_add(1, Ordering::Relaxed);
            PASTE_BYTES.fetch_add(len, Ordering::Relaxed);
        }
        sent
    }

    async fn send_event(&mut self, event: Event) -> bool {
        match self.sender.send(event).await {
            Ok(_) => true,
            Err(_) => {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                if !matches!(self.exit_reason, ExitReason::ShutdownSignal) {
                    self.exit_reason = ExitReason::ChannelClosed;
                }
                false
            }
        }
    }
}
