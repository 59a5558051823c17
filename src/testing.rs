//! Test doubles for the process and cache seams

use crate::cache::CacheBackend;
use crate::error::{SetupError, SetupResult};
use crate::process::{CommandOutput, CommandRunner};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Scripted outcome of one process invocation
#[derive(Debug, Clone)]
pub enum Response {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    SpawnError,
}

impl Response {
    pub fn ok(stdout: &str) -> Self {
        Self::Exit {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn fail(code: i32, stderr: &str) -> Self {
        Self::Exit {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

/// Runner that replays scripted responses per program
#[derive(Default)]
pub struct FakeRunner {
    queued: Mutex<HashMap<PathBuf, VecDeque<Response>>>,
    fallback: Mutex<HashMap<PathBuf, Response>>,
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `program` with `response` once the queue is empty
    pub fn respond(self, program: impl AsRef<Path>, response: Response) -> Self {
        self.fallback
            .lock()
            .unwrap()
            .insert(program.as_ref().to_path_buf(), response);
        self
    }

    /// Answer the next call to `program` with `response`
    pub fn queue(self, program: impl AsRef<Path>, response: Response) -> Self {
        self.queued
            .lock()
            .unwrap()
            .entry(program.as_ref().to_path_buf())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: impl AsRef<Path>) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == program.as_ref())
            .count()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &Path, args: &[String]) -> SetupResult<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec()));

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(program)
            .and_then(VecDeque::pop_front);
        let response = queued.or_else(|| self.fallback.lock().unwrap().get(program).cloned());

        match response {
            Some(Response::Exit {
                code,
                stdout,
                stderr,
            }) => Ok(CommandOutput {
                code: Some(code),
                stdout,
                stderr,
            }),
            Some(Response::SpawnError) | None => Err(SetupError::command_failed(
                program.display().to_string(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "not scripted"),
            )),
        }
    }
}

/// In-memory backend recording every call
pub struct MemoryBackend {
    available: bool,
    entries: Mutex<HashSet<String>>,
    failing_saves: HashSet<String>,
    failing_restores: HashSet<String>,
    restores: Mutex<Vec<(Vec<PathBuf>, String)>>,
    saves: Mutex<Vec<(Vec<PathBuf>, String)>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            available: true,
            entries: Mutex::new(HashSet::new()),
            failing_saves: HashSet::new(),
            failing_restores: HashSet::new(),
            restores: Mutex::new(Vec::new()),
            saves: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Make restores of `key` report a hit
    pub fn with_entry(self, key: &str) -> Self {
        self.entries.lock().unwrap().insert(key.to_string());
        self
    }

    /// Make saves of `key` fail
    pub fn failing_save(mut self, key: &str) -> Self {
        self.failing_saves.insert(key.to_string());
        self
    }

    /// Make restores of `key` fail
    pub fn failing_restore(mut self, key: &str) -> Self {
        self.failing_restores.insert(key.to_string());
        self
    }

    pub fn restored_keys(&self) -> Vec<String> {
        self.restores.lock().unwrap().iter().map(|(_, k)| k.clone()).collect()
    }

    pub fn saved_keys(&self) -> Vec<String> {
        self.saves.lock().unwrap().iter().map(|(_, k)| k.clone()).collect()
    }

    pub fn saves(&self) -> Vec<(Vec<PathBuf>, String)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn restore(&self, paths: &[PathBuf], key: &str) -> SetupResult<bool> {
        self.restores
            .lock()
            .unwrap()
            .push((paths.to_vec(), key.to_string()));
        if self.failing_restores.contains(key) {
            return Err(SetupError::cache(key, "download failed: connection reset"));
        }
        Ok(self.entries.lock().unwrap().contains(key))
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> SetupResult<()> {
        self.saves
            .lock()
            .unwrap()
            .push((paths.to_vec(), key.to_string()));
        if self.failing_saves.contains(key) {
            return Err(SetupError::cache(key, "reserve failed: already exists"));
        }
        self.entries.lock().unwrap().insert(key.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
