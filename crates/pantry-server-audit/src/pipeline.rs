// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, instrument, warn};

use crate::event::AuditLogEntry;
use crate::filter::AuditFilterConfig;
use crate::queue::AuditQueue;
use crate::sink::AuditSink;
use pantry_server_config::QueueOverflowPolicy;

/// Fire-and-forget audit dispatch.
///
/// `log` never waits on a sink. A background task drains the queue, applies
/// the global filter, then publishes each entry to every sink in its own task
/// so one slow or failing sink cannot hold up the others.
///
/// Under the `Block` policy at most `queue_capacity` events wait for room
/// beyond the queue itself; past that, events are dropped.
pub struct AuditService {
	queue: Arc<AuditQueue>,
	overflow_policy: QueueOverflowPolicy,
	waiters: Arc<Semaphore>,
	max_waiters: u32,
	background: Mutex<Option<JoinHandle<()>>>,
}

impl AuditService {
	/// Must be called from within a Tokio runtime.
	pub fn new(
		global_filter: AuditFilterConfig,
		queue_capacity: usize,
		overflow_policy: QueueOverflowPolicy,
		sinks: Vec<Arc<dyn AuditSink>>,
	) -> Self {
		let queue = Arc::new(AuditQueue::new(queue_capacity));
		let max_waiters = u32::try_from(queue_capacity.max(1)).unwrap_or(u32::MAX);

		let background = tokio::spawn(Self::background_task(
			Arc::clone(&queue),
			global_filter,
			sinks,
		));

		Self {
			queue,
			overflow_policy,
			waiters: Arc::new(Semaphore::new(max_waiters as usize)),
			max_waiters,
			background: Mutex::new(Some(background)),
		}
	}

	async fn background_task(
		queue: Arc<AuditQueue>,
		global_filter: AuditFilterConfig,
		sinks: Vec<Arc<dyn AuditSink>>,
	) {
		let mut publishes = JoinSet::new();

		while let Some(entry) = queue.pop().await {
			while let Some(finished) = publishes.try_join_next() {
				report_publish(finished);
			}

			if !global_filter.allows(&entry) {
				continue;
			}

			let event = Arc::new(entry);

			for sink in &sinks {
				if !sink.filter().allows(&event) {
					continue;
				}

				let sink = Arc::clone(sink);
				let event = Arc::clone(&event);

				publishes.spawn(async move {
					if let Err(e) = sink.publish(event).await {
						warn!(sink = sink.name(), error = %e, "audit sink publish failed");
					}
				});
			}
		}

		while let Some(finished) = publishes.join_next().await {
			report_publish(finished);
		}
		debug!("audit queue closed and drained, background task exiting");
	}

	/// Queue an audit event for processing.
	///
	/// Returns `true` if the event was accepted, `false` if it was dropped.
	///
	/// - `DropNewest`: a full queue rejects the new event.
	/// - `DropOldest`: a full queue evicts its oldest event; the new one is kept.
	/// - `Block`: a full queue parks the event in a task that waits for room.
	///   The caller never waits. Once `queue_capacity` events are parked,
	///   further events are dropped.
	#[instrument(skip(self, entry), fields(event_type = %entry.event_type))]
	pub fn log(&self, entry: AuditLogEntry) -> bool {
		match self.overflow_policy {
			QueueOverflowPolicy::DropNewest => match self.queue.try_push(entry) {
				Ok(()) => true,
				Err(dropped) => {
					warn!(audit_id = %dropped.id, "audit queue full, dropping event");
					false
				}
			},
			QueueOverflowPolicy::DropOldest => {
				if self.queue.is_closed() {
					return false;
				}
				if let Some(evicted) = self.queue.push_evicting(entry) {
					warn!(
						audit_id = %evicted.id,
						evicted_event_type = %evicted.event_type,
						"audit queue full, evicted oldest event"
					);
				}
				true
			}
			QueueOverflowPolicy::Block => {
				let entry = match self.queue.try_push(entry) {
					Ok(()) => return true,
					Err(entry) => entry,
				};
				if self.queue.is_closed() {
					return false;
				}
				let Ok(permit) = Arc::clone(&self.waiters).try_acquire_owned() else {
					warn!(audit_id = %entry.id, "audit queue and overflow waiters full, dropping event");
					return false;
				};
				let queue = Arc::clone(&self.queue);
				tokio::spawn(async move {
					let _permit = permit;
					if !queue.push_wait(entry).await {
						debug!("audit queue closed before parked event was queued");
					}
				});
				true
			}
		}
	}

	/// Events accepted but not yet taken by the background task, including
	/// events parked under the `Block` policy.
	pub fn pending(&self) -> usize {
		let parked = self.max_waiters as usize - self.waiters.available_permits();
		self.queue.len() + parked
	}

	/// Stop accepting events and wait until everything already accepted has
	/// been published to the sinks.
	pub async fn shutdown(&self) {
		// Parked producers hold a permit until their event is in the queue.
		match self.waiters.acquire_many(self.max_waiters).await {
			Ok(parked_done) => drop(parked_done),
			Err(e) => warn!(error = %e, "audit waiter semaphore closed"),
		}
		self.queue.close();

		let background = self.background.lock().take();
		if let Some(background) = background {
			if let Err(e) = background.await {
				warn!(error = %e, "audit background task failed");
			}
		}
	}
}

impl Drop for AuditService {
	fn drop(&mut self) {
		self.queue.close();
	}
}

fn report_publish(finished: Result<(), JoinError>) {
	if let Err(e) = finished {
		warn!(error = %e, "audit publish task failed");
	}
}
