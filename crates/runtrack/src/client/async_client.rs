use std::sync::mpsc;

use super::TrackerClient;
use crate::TrackerError;
use crate::metric::ScalarReport;
use crate::visual::Visual;

enum Message {
    Scalars(ScalarReport, usize),
    Visual(Visual, usize),
    Finish(mpsc::Sender<Result<(), TrackerError>>),
    Sync(mpsc::Sender<()>),
    End,
}

/// Client wrapper draining calls on a dedicated worker thread.
///
/// Log calls return as soon as the message is queued. Errors raised by the
/// wrapped client are deferred: each one is logged when it happens, and the
/// first one is surfaced by [finish](TrackerClient::finish).
pub struct AsyncTrackerClient {
    sender: mpsc::Sender<Message>,
    handler: Option<std::thread::JoinHandle<()>>,
}

#[derive(new)]
struct ClientThread<C: TrackerClient> {
    client: C,
    receiver: mpsc::Receiver<Message>,
    #[new(default)]
    deferred: Option<TrackerError>,
}

impl<C: TrackerClient> ClientThread<C> {
    fn run(mut self) {
        while let Ok(message) = self.receiver.recv() {
            match message {
                Message::Scalars(scalars, step) => {
                    let result = self.client.log_scalars(&scalars, step);
                    self.defer(result);
                }
                Message::Visual(visual, step) => {
                    let result = self.client.log_visual(&visual, step);
                    self.defer(result);
                }
                Message::Finish(callback) => {
                    let result = match self.deferred.take() {
                        Some(err) => Err(err),
                        None => self.client.finish(),
                    };
                    callback
                        .send(result)
                        .expect("Can return result with the callback channel.");
                }
                Message::Sync(callback) => {
                    callback
                        .send(())
                        .expect("Can return result with the callback channel.");
                }
                Message::End => {
                    return;
                }
            }
        }
    }

    fn defer(&mut self, result: Result<(), TrackerError>) {
        if let Err(err) = result {
            log::error!("Tracker client error: {err}");
            if self.deferred.is_none() {
                self.deferred = Some(err);
            }
        }
    }
}

impl AsyncTrackerClient {
    /// Create a new async client wrapping the given one.
    pub fn new<C>(client: C) -> Self
    where
        C: TrackerClient + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let thread = ClientThread::new(client, receiver);

        let handler = Some(std::thread::spawn(move || thread.run()));

        Self { sender, handler }
    }

    /// Wait until every queued call has been processed.
    pub fn sync(&self) {
        let (sender, receiver) = mpsc::channel();

        self.sender
            .send(Message::Sync(sender))
            .expect("Can send message to client thread.");

        receiver
            .recv()
            .expect("Should sync, otherwise the thread is dead.");
    }
}

impl TrackerClient for AsyncTrackerClient {
    fn log_scalars(&mut self, scalars: &ScalarReport, step: usize) -> Result<(), TrackerError> {
        self.sender
            .send(Message::Scalars(scalars.clone(), step))
            .expect("Can log using the client thread.");

        Ok(())
    }

    fn log_visual(&mut self, visual: &Visual, step: usize) -> Result<(), TrackerError> {
        self.sender
            .send(Message::Visual(visual.clone(), step))
            .expect("Can log using the client thread.");

        Ok(())
    }

    fn finish(&mut self) -> Result<(), TrackerError> {
        let (sender, receiver) = mpsc::channel();

        self.sender
            .send(Message::Finish(sender))
            .expect("Can finish using the client thread.");

        receiver
            .recv()
            .expect("Should finish, otherwise the thread is dead.")
    }
}

impl Drop for AsyncTrackerClient {
    fn drop(&mut self) {
        self.sender
            .send(Message::End)
            .expect("Can send the end message to the client thread.");
        let handler = self.handler.take();

        if let Some(handler) = handler {
            handler.join().expect("The client thread should stop.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedClient {
        calls: Arc<Mutex<Vec<(String, usize)>>>,
    }

    impl TrackerClient for SharedClient {
        fn log_scalars(&mut self, _scalars: &ScalarReport, step: usize) -> Result<(), TrackerError> {
            self.calls.lock().unwrap().push(("scalars".to_string(), step));
            Ok(())
        }

        fn log_visual(&mut self, visual: &Visual, step: usize) -> Result<(), TrackerError> {
            self.calls.lock().unwrap().push((visual.name.clone(), step));
            Ok(())
        }

        fn finish(&mut self) -> Result<(), TrackerError> {
            self.calls.lock().unwrap().push(("finish".to_string(), 0));
            Ok(())
        }
    }

    struct FailingClient;

    impl TrackerClient for FailingClient {
        fn log_scalars(&mut self, _scalars: &ScalarReport, _step: usize) -> Result<(), TrackerError> {
            Err(TrackerError::Other("backend rejected the report".to_string()))
        }

        fn log_visual(&mut self, _visual: &Visual, _step: usize) -> Result<(), TrackerError> {
            Ok(())
        }

        fn finish(&mut self) -> Result<(), TrackerError> {
            Ok(())
        }
    }

    #[test]
    fn drains_calls_in_order() {
        let inner = SharedClient::default();
        let calls = inner.calls.clone();
        let mut client = AsyncTrackerClient::new(inner);

        client.log_scalars(&HashMap::new(), 1).unwrap();
        client.log_scalars(&HashMap::new(), 2).unwrap();
        client.sync();

        assert_eq!(
            vec![("scalars".to_string(), 1), ("scalars".to_string(), 2)],
            *calls.lock().unwrap()
        );

        client.finish().unwrap();
        assert_eq!(3, calls.lock().unwrap().len());
    }

    #[test]
    fn surfaces_deferred_errors_on_finish() {
        let mut client = AsyncTrackerClient::new(FailingClient);

        // Queued without error; the failure happens on the worker thread.
        client.log_scalars(&HashMap::new(), 1).unwrap();

        assert!(client.finish().is_err());
    }
}
