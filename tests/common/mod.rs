#![allow(unused)]

use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::{self, Receiver},
        Mutex,
    },
    thread,
    time::Duration,
};
use thunkwrap::{Args, Completion, EventSource, Error, Listener, Result};

/// Runs `f` shortly after on another thread.
fn later(f: impl FnOnce() + Send + 'static) {
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(1));
        f()
    });
}

#[derive(Default)]
pub struct Dummy {
    cp: String,
    calls: AtomicUsize,
}

impl Dummy {
    pub fn new(cp: &str) -> Self {
        Self {
            cp: cp.to_owned(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[thunkwrap::source]
impl Dummy {
    #[thunk(name = "doNoParams")]
    fn do_no_params(&self, callback: Completion) {
        let res = self.cp.clone();
        later(move || callback(vec![Value::Null, json!(res)]));
    }

    #[thunk(name = "doWithMultipleResults")]
    fn do_with_multiple_results(&self, callback: Completion) {
        later(move || callback(vec![Value::Null, json!("RES1"), json!("RES2")]));
    }

    #[thunk(name = "doWithParams")]
    fn do_with_params(&self, p1: String, p2: String, callback: Completion) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let res = format!("{} {} {}", p1, p2, self.cp);
        later(move || callback(vec![Value::Null, json!(res)]));
    }

    #[thunk(name = "doFail")]
    fn do_fail(&self, callback: Completion) {
        later(move || callback(vec![json!("boom")]));
    }

    #[sync(name = "doNoCallback")]
    fn do_no_callback(&self, p: String) -> String {
        format!("{} {}", self.cp, p)
    }

    #[sync(name = "doNoCallbackNoParams")]
    fn do_no_callback_no_params(&self) -> String {
        self.cp.clone()
    }

    #[thunk(name = "doBiMode")]
    fn do_bi_mode_async(&self, p: String, callback: Completion) {
        later(move || callback(vec![Value::Null, json!(format!("ASYNC {}", p))]));
    }

    #[sync(name = "doBiMode")]
    fn do_bi_mode(&self, p: String) -> String {
        format!("SYNC {}", p)
    }
}

/// Emitter with `on` and `once` subscription methods.
#[derive(Default)]
pub struct Emitter {
    listeners: Mutex<HashMap<String, Vec<(Listener, bool)>>>,
}

impl Emitter {
    pub fn emit(&self, event: &str, args: Args) {
        let current = {
            let mut listeners = self.listeners.lock().unwrap();
            let entry = listeners.entry(event.to_owned()).or_default();
            let current = entry.clone();
            entry.retain(|(_, once)| !once);
            current
        };
        for (listener, _) in current {
            listener(args.clone());
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .unwrap()
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl EventSource for Emitter {
    fn subscribe(&self, method: &str, event: &str, listener: Listener) -> Result<()> {
        let once = match method {
            "on" => false,
            "once" => true,
            _ => return Err(Error::NoSuchMethod(method.to_owned())),
        };
        self.listeners
            .lock()
            .unwrap()
            .entry(event.to_owned())
            .or_default()
            .push((listener, once));
        Ok(())
    }
}

/// A completion that forwards what it receives to the returned receiver.
pub fn completion() -> (impl FnOnce(Args) + Send + 'static, Receiver<Args>) {
    let (tx, rx) = mpsc::channel();
    (
        move |args| {
            let _ = tx.send(args);
        },
        rx,
    )
}

/// Same as [`completion`] for a listener that may fire repeatedly.
pub fn listener() -> (impl Fn(Args) + Send + Sync + 'static, Receiver<Args>) {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    (
        move |args| {
            let _ = tx.lock().unwrap().send(args);
        },
        rx,
    )
}

pub fn wait(rx: &Receiver<Args>) -> Args {
    rx.recv_timeout(Duration::from_secs(5))
        .expect("completion was not called")
}
