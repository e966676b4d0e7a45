use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use super::config::EngineConfig;
use super::errors::SessionError;
use super::format::Snapshot;
use super::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sessions keyed per client. Each session has its own lock, so two clients
/// never contend and one client's requests are applied one at a time.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    config: EngineConfig,
    next_id: AtomicU64,
    sessions: Mutex<HashMap<SessionId, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, next_id: AtomicU64::new(0), sessions: Mutex::new(HashMap::new()) }
    }

    pub fn open(&self) -> SessionId {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let session = Arc::new(Mutex::new(Session::new(self.config.clone())));
        self.sessions.lock().insert(id, session);
        info!(%id, "session opened");
        id
    }

    /// Returns true if the session existed.
    pub fn close(&self, id: SessionId) -> bool {
        let removed = self.sessions.lock().remove(&id).is_some();
        if removed {
            info!(%id, "session closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start_execution(&self, id: SessionId, text: &str) -> Result<Snapshot, SessionError> {
        self.with_session(id, |s| Ok(s.start_execution(text)?))
    }

    pub fn step_forward(&self, id: SessionId) -> Result<Snapshot, SessionError> {
        self.with_session(id, |s| Ok(s.step_forward()?))
    }

    pub fn step_back(&self, id: SessionId) -> Result<Snapshot, SessionError> {
        self.with_session(id, |s| Ok(s.step_back()?))
    }

    pub fn current_state(&self, id: SessionId) -> Result<Snapshot, SessionError> {
        self.with_session(id, |s| Ok(s.current_state()))
    }

    // The registry lock is released before the session lock is taken.
    fn with_session<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut Session) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let session = self
            .sessions
            .lock()
            .get(&id)
            .cloned()
            .ok_or(SessionError::UnknownSession(id))?;
        let mut guard = session.lock();
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::errors::StepError;
    use crate::engine::registers::Register;
    use std::thread;

    #[test]
    fn sessions_are_isolated() {
        let reg = SessionRegistry::default();
        let a = reg.open();
        let b = reg.open();
        reg.start_execution(a, "movq $1,%rax\n").unwrap();
        reg.start_execution(b, "movq $2,%rax\n").unwrap();
        reg.step_forward(a).unwrap();
        assert_eq!(reg.current_state(a).unwrap().reg(Register::Rax), 1);
        assert_eq!(reg.current_state(b).unwrap().reg(Register::Rax), 0);
        reg.step_forward(b).unwrap();
        assert_eq!(reg.current_state(b).unwrap().reg(Register::Rax), 2);
    }

    #[test]
    fn unknown_and_closed_ids() {
        let reg = SessionRegistry::default();
        let id = reg.open();
        assert!(reg.close(id));
        assert!(!reg.close(id));
        assert_eq!(reg.step_forward(id), Err(SessionError::UnknownSession(id)));
        assert!(reg.is_empty());
    }

    #[test]
    fn step_errors_pass_through() {
        let reg = SessionRegistry::default();
        let id = reg.open();
        reg.start_execution(id, "ret\n").unwrap();
        assert_eq!(reg.step_back(id), Err(SessionError::Step(StepError::NoHistory)));
    }

    #[test]
    fn concurrent_clients_on_one_session_serialize() {
        let reg = Arc::new(SessionRegistry::default());
        let id = reg.open();
        let src = "addq $1,%rax\n".repeat(400);
        reg.start_execution(id, &src).unwrap();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let reg = Arc::clone(&reg);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.step_forward(id).unwrap();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        let snap = reg.current_state(id).unwrap();
        assert_eq!(snap.step_count, 400);
        assert_eq!(snap.reg(Register::Rax), 400);
    }
}
