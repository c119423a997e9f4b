use std::sync::{Arc, Mutex};

/// Ends the process after a fatal log line.
///
/// [`ProcessExit`] never returns. Test doubles like [`ExitRecorder`] do, which
/// lets the fatal paths be exercised without ending the test process.
pub trait Terminator: Sync + Send {
    fn exit(&self, code: i32);
}

pub type SharedTerminator = Arc<dyn Terminator>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn exit(&self, code: i32) {
        std::process::exit(code)
    }
}

/// Records exit codes instead of exiting.
#[derive(Debug, Clone, Default)]
pub struct ExitRecorder {
    codes: Arc<Mutex<Vec<i32>>>,
}

impl ExitRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codes(&self) -> Vec<i32> {
        match self.codes.lock() {
            Ok(codes) => codes.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Terminator for ExitRecorder {
    fn exit(&self, code: i32) {
        if let Ok(mut codes) = self.codes.lock() {
            codes.push(code);
        }
    }
}
