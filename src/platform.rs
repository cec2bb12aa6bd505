//! Executor and timer primitives the room session runs on.
//!
//! Everything is driven on a single thread: tasks are spawned onto the
//! current [`LocalSet`], so any [`spawn()`] call must happen inside one.
//!
//! [`LocalSet`]: tokio::task::LocalSet

use std::{future::Future, time::Duration};

use futures::future;

use crate::utils::TaskHandle;

/// Spawns the provided [`Future`] onto the current thread's [`LocalSet`].
///
/// # Panics
///
/// If called outside of a [`LocalSet`] context.
///
/// [`LocalSet`]: tokio::task::LocalSet
#[inline]
pub fn spawn<F>(task: F)
where
    F: Future<Output = ()> + 'static,
{
    drop(tokio::task::spawn_local(task));
}

/// Spawns the provided [`Future`] returning a [`TaskHandle`] which aborts it
/// once dropped.
///
/// # Panics
///
/// If called outside of a [`LocalSet`] context.
///
/// [`LocalSet`]: tokio::task::LocalSet
pub fn spawn_abortable<F>(task: F) -> TaskHandle
where
    F: Future<Output = ()> + 'static,
{
    let (fut, abort) = future::abortable(task);
    spawn(async move {
        fut.await.ok();
    });
    abort.into()
}

/// [`Future`] which resolves after the provided [`Duration`].
#[inline]
pub async fn delay_for(delay: Duration) {
    tokio::time::sleep(delay).await;
}
