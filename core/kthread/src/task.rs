// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Handle-owning task wrapper.

use core::{
    ffi::c_void,
    ptr::{self, NonNull},
    sync::atomic::{AtomicPtr, Ordering},
};

use crate::{
    error::{Result, TaskError},
    priority::TaskPriority,
    sched::{RawTaskHandle, TaskFn},
};

/// A scheduler thread created from an entry function.
///
/// The thread is created by [`Task::new`] and, when the `task-delete` feature
/// is enabled, deleted when the `Task` is dropped. Without `task-delete` the
/// thread keeps running after the wrapper is gone.
///
/// A `Task` is the single owner of its thread, so it can be moved but never
/// duplicated:
///
/// ```compile_fail
/// use kthread::Task;
///
/// fn duplicate(task: &Task) -> Task {
///     task.clone()
/// }
/// ```
///
/// Most methods are only present when the matching scheduler capability is
/// enabled (see the crate-level feature list). They pass the stored handle
/// straight to the scheduler. If creation failed, the stored handle is absent
/// and the scheduler interprets it as the calling task.
///
/// Tasks are best created once at start-up as `static` or long-lived objects
/// rather than created and destroyed while the system runs.
///
/// # Example
///
/// ```rust,ignore
/// use core::ptr;
/// use kthread::{PriorityTier, Task, config::MINIMAL_STACK_SIZE};
///
/// extern "C" fn blink(_: *mut core::ffi::c_void) {
///     loop {
///         // toggle a led, then sleep
///     }
/// }
///
/// let task = Task::new("blink", blink, PriorityTier::Low, MINIMAL_STACK_SIZE, ptr::null_mut());
/// assert!(task.is_created());
/// ```
pub struct Task {
    name: &'static str,
    handle: AtomicPtr<c_void>,
}

impl Task {
    /// Creates a thread running `entry(param)`.
    ///
    /// The returned `Task` holds no thread if the scheduler failed to create
    /// one; check [`Task::is_created`] or use [`Task::try_new`].
    ///
    /// `param` is handed to `entry` untouched; keeping whatever it points to
    /// alive is the caller's responsibility.
    pub fn new(
        name: &'static str,
        entry: TaskFn,
        priority: impl Into<TaskPriority>,
        stack_depth: u16,
        param: *mut c_void,
    ) -> Self {
        let task = Self::unstarted(name);
        task.start(entry, priority.into(), stack_depth, param);
        task
    }

    /// Like [`Task::new`], but reports a creation failure as an error.
    pub fn try_new(
        name: &'static str,
        entry: TaskFn,
        priority: impl Into<TaskPriority>,
        stack_depth: u16,
        param: *mut c_void,
    ) -> Result<Self> {
        let task = Self::new(name, entry, priority, stack_depth, param);
        if task.is_created() {
            Ok(task)
        } else {
            Err(TaskError::CreateFailed { name })
        }
    }

    /// A wrapper that owns no thread yet.
    pub(crate) const fn unstarted(name: &'static str) -> Self {
        Self {
            name,
            handle: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Asks the scheduler for the thread and stores its handle.
    pub(crate) fn start(
        &self,
        entry: TaskFn,
        priority: TaskPriority,
        stack_depth: u16,
        param: *mut c_void,
    ) -> Option<RawTaskHandle> {
        let handle = crate_interface::call_interface!(
            crate::sched::SchedulerIf::create,
            entry,
            self.name,
            stack_depth,
            param,
            priority.get()
        );
        match handle {
            Some(raw) => debug!(
                "task {:?} created: handle={:p}, priority={}, stack_depth={}",
                self.name, raw, priority, stack_depth
            ),
            None => warn!("scheduler failed to create task {:?}", self.name),
        }
        self.handle
            .store(handle.map_or(ptr::null_mut(), NonNull::as_ptr), Ordering::SeqCst);
        handle
    }

    /// Removes the stored handle, leaving the wrapper without a thread.
    pub(crate) fn take_handle(&self) -> Option<RawTaskHandle> {
        NonNull::new(self.handle.swap(ptr::null_mut(), Ordering::SeqCst))
    }

    /// Returns the task name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the scheduler handle, or `None` if there is no thread.
    pub fn handle(&self) -> Option<RawTaskHandle> {
        NonNull::new(self.handle.load(Ordering::Acquire))
    }

    /// Returns `true` if the wrapper currently owns a thread.
    pub fn is_created(&self) -> bool {
        self.handle().is_some()
    }

    /// Returns the current priority reported by the scheduler.
    #[cfg(feature = "task-priority-get")]
    pub fn priority(&self) -> TaskPriority {
        TaskPriority::from_raw(crate_interface::call_interface!(
            crate::sched::SchedulerIf::priority_get,
            self.handle()
        ))
    }

    /// Changes the priority of the task.
    #[cfg(feature = "task-priority-set")]
    pub fn set_priority(&self, priority: impl Into<TaskPriority>) {
        let priority = priority.into();
        trace!("task {:?}: set priority {}", self.name, priority);
        crate_interface::call_interface!(
            crate::sched::SchedulerIf::priority_set,
            self.handle(),
            priority.get()
        );
    }

    /// Suspends the task until [`Task::resume`] is called.
    #[cfg(feature = "task-suspend")]
    pub fn suspend(&self) {
        trace!("task {:?}: suspend", self.name);
        crate_interface::call_interface!(crate::sched::SchedulerIf::suspend, self.handle());
    }

    /// Resumes a suspended task.
    #[cfg(feature = "task-suspend")]
    pub fn resume(&self) {
        trace!("task {:?}: resume", self.name);
        crate_interface::call_interface!(crate::sched::SchedulerIf::resume, self.handle());
    }

    /// Resumes a suspended task from an interrupt handler.
    ///
    /// This is the only method that may be called from interrupt context.
    /// Returns `true` if the handler should request a context switch.
    #[cfg(feature = "task-resume-from-isr")]
    pub fn resume_from_isr(&self) -> bool {
        crate_interface::call_interface!(crate::sched::SchedulerIf::resume_from_isr, self.handle())
    }

    /// Deletes the thread now.
    ///
    /// The handle is cleared first, so deleting again or dropping the wrapper
    /// afterwards does nothing.
    #[cfg(feature = "task-delete")]
    pub fn delete(&self) {
        if let Some(raw) = self.take_handle() {
            debug!("task {:?} deleted: handle={:p}", self.name, raw);
            crate_interface::call_interface!(crate::sched::SchedulerIf::delete, Some(raw));
        }
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        cfg_if::cfg_if! {
            if #[cfg(feature = "task-delete")] {
                self.delete();
            } else {
                if let Some(raw) = self.handle() {
                    debug!("task {:?} outlives its wrapper: handle={:p}", self.name, raw);
                }
            }
        }
    }
}
