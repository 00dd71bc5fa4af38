use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Instant;

use jjdeck_app::App;
use tracing::debug;

use crate::command::Command;
use crate::msg::Msg;

pub(crate) type Executor = Arc<dyn Fn(Command) -> Msg + Send + Sync>;

/// Runs each command on its own worker thread and posts the result message
/// back to the event loop's inbox.
pub(crate) struct Scheduler {
    executor: Executor,
    sender: Sender<Msg>,
}

impl Scheduler {
    pub(crate) fn new(executor: Executor) -> (Self, Receiver<Msg>) {
        let (sender, receiver) = mpsc::channel();
        (Self { executor, sender }, receiver)
    }

    pub(crate) fn for_app(app: Arc<App>) -> (Self, Receiver<Msg>) {
        Self::new(Arc::new(move |command: Command| command.execute(&app)))
    }

    pub(crate) fn spawn(&self, command: Command) {
        let executor = Arc::clone(&self.executor);
        let sender = self.sender.clone();
        let label = command.label();
        debug!(command = label, "scheduling command");

        thread::spawn(move || {
            let started = Instant::now();
            let msg = executor(command);
            debug!(
                command = label,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "command finished"
            );
            if sender.send(msg).is_err() {
                debug!(command = label, "dashboard closed before result was delivered");
            }
        });
    }

    pub(crate) fn spawn_all(&self, commands: Vec<Command>) {
        for command in commands {
            self.spawn(command);
        }
    }
}
