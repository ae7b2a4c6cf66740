//! Shared fixtures for integration tests
#![allow(dead_code)]

use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};

use funcmap::errors::HelperError;
use funcmap::handler::{ErrorStrategy, FunctionHandler, HandlerOption, Logger};
use funcmap::registry::FuncMap;

/// In-memory log sink
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A dedicated logger writing plain text into a buffer
pub fn capture_logger() -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    (Logger::from_subscriber(subscriber), buffer)
}

pub fn handler_with(strategy: ErrorStrategy) -> Arc<FunctionHandler> {
    Arc::new(FunctionHandler::new([HandlerOption::Strategy(strategy)]))
}

pub fn bad_input() -> HelperError {
    HelperError::message("bad input")
}

/// Helpers that always fail with "bad input"
///
/// `failInt` declares an integer result, `failString` a string result.
pub fn failing_helpers(handler: &Arc<FunctionHandler>) -> FuncMap {
    let mut funcs = FuncMap::new();

    let shared = Arc::clone(handler);
    funcs.register("failInt", move |_| {
        let value = shared.resolve::<i64>("failInt", Err(bad_input()))?;
        Ok(json!(value))
    });

    let shared = Arc::clone(handler);
    funcs.register("failString", move |_| {
        let value = shared.resolve::<String>("failString", Err(bad_input()))?;
        Ok(json!(value))
    });

    funcs
}
