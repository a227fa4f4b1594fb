//! In-memory host double for unit tests

use crate::host::Host;
use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

/// Records every host interaction and can be told to fail registration or
/// diagnostic publication. Dynamic majors are handed out from 240 up.
pub(crate) struct RecordingHost {
    fail_register: AtomicBool,
    fail_publish: AtomicBool,
    next_major: AtomicU32,
    devices: Mutex<Vec<(u32, String)>>,
    diagnostics: Mutex<Vec<String>>,
    logs: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            fail_register: AtomicBool::new(false),
            fail_publish: AtomicBool::new(false),
            next_major: AtomicU32::new(240),
            devices: Mutex::new(Vec::new()),
            diagnostics: Mutex::new(Vec::new()),
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_register(&self) {
        self.fail_register.store(true, Ordering::SeqCst);
    }

    pub fn fail_publish(&self) {
        self.fail_publish.store(true, Ordering::SeqCst);
    }

    pub fn devices(&self) -> Vec<(u32, String)> {
        self.devices.lock().unwrap().clone()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.lock().unwrap().clone()
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }
}

impl Host for RecordingHost {
    fn register_device(&self, major: u32, name: &str) -> Result<u32> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(Error::Registration(format!("can't get major {major}")));
        }
        let assigned = if major == 0 {
            self.next_major.fetch_add(1, Ordering::SeqCst)
        } else {
            major
        };
        self.devices
            .lock()
            .unwrap()
            .push((assigned, name.to_string()));
        Ok(assigned)
    }

    fn unregister_device(&self, major: u32, name: &str) {
        self.devices
            .lock()
            .unwrap()
            .retain(|(m, n)| !(*m == major && n == name));
    }

    fn publish_diagnostic(&self, name: &str) -> Result<()> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(Error::Diagnostic(format!("can't publish {name}")));
        }
        self.diagnostics.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn remove_diagnostic(&self, name: &str) {
        self.diagnostics.lock().unwrap().retain(|n| n != name);
    }

    fn log_line(&self, line: &str) {
        self.logs.lock().unwrap().push(line.to_string());
    }
}
