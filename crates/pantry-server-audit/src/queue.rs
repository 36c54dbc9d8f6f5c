// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded FIFO between request handlers and the audit background task.
//!
//! A plain `mpsc` channel cannot evict its oldest message, so the queue is a
//! `VecDeque` under a mutex with two `Notify` handles: `available` wakes the
//! single consumer, `space` wakes producers waiting under the block policy.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::event::AuditLogEntry;

pub(crate) struct AuditQueue {
	entries: Mutex<VecDeque<AuditLogEntry>>,
	capacity: usize,
	available: Notify,
	space: Notify,
	closed: AtomicBool,
}

impl AuditQueue {
	pub(crate) fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
			capacity,
			available: Notify::new(),
			space: Notify::new(),
			closed: AtomicBool::new(false),
		}
	}

	/// Enqueue if there is room; otherwise hand the entry back.
	pub(crate) fn try_push(&self, entry: AuditLogEntry) -> Result<(), AuditLogEntry> {
		if self.is_closed() {
			return Err(entry);
		}
		{
			let mut entries = self.entries.lock();
			if entries.len() >= self.capacity {
				return Err(entry);
			}
			entries.push_back(entry);
		}
		self.available.notify_one();
		Ok(())
	}

	/// Enqueue, evicting the oldest entry when full. Returns the evicted entry.
	pub(crate) fn push_evicting(&self, entry: AuditLogEntry) -> Option<AuditLogEntry> {
		if self.is_closed() {
			return Some(entry);
		}
		let evicted = {
			let mut entries = self.entries.lock();
			let evicted = if entries.len() >= self.capacity {
				entries.pop_front()
			} else {
				None
			};
			entries.push_back(entry);
			evicted
		};
		self.available.notify_one();
		evicted
	}

	/// Wait for room, then enqueue. Returns `false` if the queue closed first.
	pub(crate) async fn push_wait(&self, mut entry: AuditLogEntry) -> bool {
		loop {
			let space = self.space.notified();
			match self.try_push(entry) {
				Ok(()) => return true,
				Err(rejected) => {
					if self.is_closed() {
						return false;
					}
					entry = rejected;
				}
			}
			space.await;
		}
	}

	/// Next entry in FIFO order. `None` once closed and drained.
	pub(crate) async fn pop(&self) -> Option<AuditLogEntry> {
		loop {
			let next = self.entries.lock().pop_front();
			if let Some(entry) = next {
				self.space.notify_one();
				return Some(entry);
			}
			if self.is_closed() {
				return None;
			}
			self.available.notified().await;
		}
	}

	pub(crate) fn close(&self) {
		self.closed.store(true, Ordering::Release);
		self.available.notify_one();
		self.space.notify_waiters();
	}

	pub(crate) fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.lock().len()
	}
}
