//! Shutdown propagation to long-lived admin streams.

use tokio::sync::watch;

/// Flips the gateway into draining state. Held by the server.
#[derive(Debug)]
pub struct DrainTrigger {
    tx: watch::Sender<bool>,
}

/// Observed by every admin stream; resolves once draining starts.
#[derive(Debug, Clone)]
pub struct DrainSignal {
    rx: watch::Receiver<bool>,
}

pub fn drain_channel() -> (DrainTrigger, DrainSignal) {
    let (tx, rx) = watch::channel(false);
    (DrainTrigger { tx }, DrainSignal { rx })
}

impl DrainTrigger {
    pub fn drain(&self) {
        self.tx.send_replace(true);
    }

    pub fn signal(&self) -> DrainSignal {
        DrainSignal { rx: self.tx.subscribe() }
    }
}

impl DrainSignal {
    pub fn is_draining(&self) -> bool {
        *self.rx.borrow()
    }

    pub async fn wait(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                // trigger dropped without draining: never fires
                std::future::pending::<()>().await;
            }
        }
    }
}
