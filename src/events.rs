use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use unsegen::input::Input;

use crate::config::Config;

pub enum Event {
    Input(Input),
    /// Periodic wake-up so resizes get redrawn without input.
    Update,
}

/// Collects terminal input and timer ticks on one channel.
pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    _input_handle: thread::JoinHandle<()>,
    _update_handle: thread::JoinHandle<()>,
}

impl Dispatcher {
    pub fn from_config(config: &Config) -> Dispatcher {
        Dispatcher::with_tick_rate(config.tick_rate())
    }

    pub fn with_tick_rate(tick_rate: Duration) -> Dispatcher {
        let (tx, rx) = mpsc::channel();

        let input_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                let stdin = stdin.lock();
                for evt in Input::read_all(stdin) {
                    match evt {
                        Ok(key) => {
                            if tx.send(Event::Input(key)).is_err() {
                                return;
                            }
                        }
                        Err(e) => log::warn!("Error reading input: {}", e),
                    }
                }
            })
        };

        let update_handle = thread::spawn(move || {
            while tx.send(Event::Update).is_ok() {
                thread::sleep(tick_rate);
            }
        });

        Dispatcher {
            rx,
            _input_handle: input_handle,
            _update_handle: update_handle,
        }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
