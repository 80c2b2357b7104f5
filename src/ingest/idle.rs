//! Idle Timeout
//!
//! Guards byte sources that may stall mid-stream.

use crate::error::{ChatStreamError, Result};
use futures::Stream;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Instant, Sleep};

pin_project! {
    /// Fails a source with `Timeout` when no item arrives within the idle window
    ///
    /// With no window configured the wrapper passes items straight through.
    pub struct IdleTimeout<S> {
        #[pin]
        inner: S,
        window: Option<Duration>,
        sleep: Option<Pin<Box<Sleep>>>,
        expired: bool,
    }
}

impl<S> IdleTimeout<S> {
    pub fn new(inner: S, window: Option<Duration>) -> Self {
        Self {
            inner,
            window,
            sleep: None,
            expired: false,
        }
    }
}

impl<S, B> Stream for IdleTimeout<S>
where
    S: Stream<Item = Result<B>>,
{
    type Item = Result<B>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.expired {
            return Poll::Ready(None);
        }

        let Some(window) = *this.window else {
            return this.inner.poll_next(cx);
        };

        match this.inner.poll_next(cx) {
            Poll::Ready(item) => {
                if let Some(sleep) = this.sleep.as_mut() {
                    sleep.as_mut().reset(Instant::now() + window);
                }
                Poll::Ready(item)
            }
            Poll::Pending => {
                let sleep = this
                    .sleep
                    .get_or_insert_with(|| Box::pin(tokio::time::sleep(window)));

                match sleep.as_mut().poll(cx) {
                    Poll::Ready(()) => {
                        *this.expired = true;
                        Poll::Ready(Some(Err(ChatStreamError::Timeout(format!(
                            "no data received for {:?}",
                            window
                        )))))
                    }
                    Poll::Pending => Poll::Pending,
                }
            }
        }
    }
}
