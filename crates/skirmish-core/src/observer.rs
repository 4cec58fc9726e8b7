//! Fight observers.
//!
//! Every NPC keeps an ordered list of shared observers and reports each fight
//! it defends to all of them. Observers must not unwind into the simulation:
//! failures come back as [`ObserverError`] and are logged by the caller.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::error::ObserverError;
use crate::npc::Npc;

/// Something that wants to hear about resolved fights.
pub trait FightObserver: Send + Sync {
    fn on_fight(&self, attacker: &Npc, defender: &Npc, win: bool) -> Result<(), ObserverError>;
}

/// Kill log: counts winning fights and writes one block per kill.
///
/// Losing outcomes are ignored. If the log file cannot be opened the observer
/// still works, it just has nowhere to write.
pub struct TextObserver {
    state: Mutex<KillLog>,
}

struct KillLog {
    kills: u64,
    sink: Option<Box<dyn Write + Send>>,
    echo: bool,
}

impl TextObserver {
    /// Append to the file at `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self::with_writer(file),
            Err(e) => {
                log::error!("Could not open log file {}: {}", path.display(), e);
                Self::detached()
            }
        }
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self::from_sink(Some(Box::new(writer)))
    }

    /// No file sink; kills are still counted.
    pub fn detached() -> Self {
        Self::from_sink(None)
    }

    fn from_sink(sink: Option<Box<dyn Write + Send>>) -> Self {
        Self {
            state: Mutex::new(KillLog {
                kills: 0,
                sink,
                echo: false,
            }),
        }
    }

    /// Also print every block to stdout.
    pub fn with_console_echo(self, echo: bool) -> Self {
        self.lock().echo = echo;
        self
    }

    pub fn kills(&self) -> u64 {
        self.lock().kills
    }

    pub fn has_sink(&self) -> bool {
        self.lock().sink.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, KillLog> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FightObserver for TextObserver {
    fn on_fight(&self, attacker: &Npc, defender: &Npc, win: bool) -> Result<(), ObserverError> {
        if !win {
            return Ok(());
        }
        let mut state = self.lock();
        state.kills += 1;
        let block = format!("\n[{}] Murder --------\n{}\n{}\n", state.kills, attacker, defender);
        if state.echo {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(block.as_bytes())?;
            stdout.flush()?;
        }
        if let Some(sink) = state.sink.as_mut() {
            sink.write_all(block.as_bytes())?;
            sink.flush()?;
        }
        Ok(())
    }
}
