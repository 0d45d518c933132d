//! Request/response over a mailbox.

use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;

use super::{Address, Envelope, Mailbox};
use crate::messages::{Request, Response};
use crate::types::{Error, Result};

/// Send `request` to `mailbox` for `target` and wait for the single reply.
///
/// Fails with [`Error::Unreachable`] when the mailbox is closed or drops the
/// reply, [`Error::Timeout`] when `deadline` elapses, and [`Error::Internal`]
/// when the reply is not the kind paired with the request. Errors returned by
/// the handler are passed through unchanged. No retries.
pub async fn ask<Req, Resp>(
    mailbox: &Mailbox,
    target: Address,
    request: Req,
    deadline: Duration,
) -> Result<Resp>
where
    Req: Into<Request>,
    Resp: TryFrom<Response, Error = Response>,
{
    let request = request.into();
    let kind = request.kind();
    let (reply_tx, reply_rx) = oneshot::channel();

    tracing::debug!("Ask {} -> {} via {}", kind, target, mailbox.address());

    mailbox.deliver(Envelope {
        target: target.clone(),
        request,
        reply: reply_tx,
    })?;

    let reply = timeout(deadline, reply_rx)
        .await
        .map_err(|_| {
            Error::timeout(format!(
                "{} to {} timed out after {}ms",
                kind,
                target,
                deadline.as_millis()
            ))
        })?
        .map_err(|_| {
            Error::unreachable(format!("{} dropped the reply to {}", mailbox.address(), kind))
        })?;

    Resp::try_from(reply?).map_err(|other| {
        Error::internal(format!(
            "unexpected reply {} to {} from {}",
            other.kind(),
            kind,
            target
        ))
    })
}
