//! Mailbox runtime for backend components.
//!
//! Each backend component is a single-threaded message handler running on its
//! own tokio task and draining one mailbox:
//!   - **Mailbox**: cloneable sending half, addressed by a symbolic [`Address`]
//!   - **Envelope**: typed request plus a oneshot reply channel
//!   - **Ask**: send one request, await exactly one reply, bounded by a deadline
//!
//! Mailboxes are published through the [`Directory`], which is built once at
//! startup and never mutated afterwards.

mod address;
mod ask;
mod directory;

pub use address::{Address, AGENTS, AGENT_RM, KUBERNETES_RM, PODS, RESOURCE_MANAGERS};
pub use ask::ask;
pub use directory::{Directory, DirectoryBuilder};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::messages::{Request, Response};
use crate::types::{Error, Result};

/// Reply carried back to the asker.
pub type Reply = Result<Response>;

/// One request in flight.
#[derive(Debug)]
pub struct Envelope {
    /// Full address the request is meant for. May be a descendant of the
    /// receiving mailbox, which then resolves the remainder itself.
    pub target: Address,
    pub request: Request,
    pub reply: oneshot::Sender<Reply>,
}

/// Sending half of a component's mailbox.
#[derive(Debug, Clone)]
pub struct Mailbox {
    address: Address,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl Mailbox {
    /// Create a mailbox and the receiver its owner drains.
    pub fn channel(address: Address) -> (Self, mpsc::UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { address, tx }, rx)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Whether the owning task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub(crate) fn deliver(&self, envelope: Envelope) -> Result<()> {
        self.tx
            .send(envelope)
            .map_err(|_| Error::unreachable(format!("mailbox {} is closed", self.address)))
    }
}

/// Behaviour of a component that owns a mailbox.
#[async_trait]
pub trait Handler: Send + 'static {
    /// Handle one request addressed to `target` (this mailbox or a descendant).
    async fn handle(&mut self, target: &Address, request: Request) -> Reply;
}

/// Spawn `handler` on its own task behind a fresh mailbox at `address`.
///
/// The task exits once every [`Mailbox`] clone has been dropped.
pub fn spawn<H: Handler>(address: Address, mut handler: H) -> (Mailbox, JoinHandle<()>) {
    let (mailbox, mut rx) = Mailbox::channel(address.clone());

    let handle = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let kind = envelope.request.kind();
            let reply = handler.handle(&envelope.target, envelope.request).await;
            if envelope.reply.send(reply).is_err() {
                tracing::debug!(
                    "Asker for {} at {} went away before the reply",
                    kind,
                    envelope.target
                );
            }
        }
        tracing::debug!("Mailbox {} closed", address);
    });

    (mailbox, handle)
}
