// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Tasks whose body is a method of an object.

use alloc::boxed::Box;
use core::{
    ffi::c_void,
    marker::PhantomData,
    ops::Deref,
    ptr::NonNull,
    sync::atomic::{AtomicU8, Ordering},
};

use crate::{
    error::{Result, TaskError},
    priority::TaskPriority,
    task::Task,
};

/// The body of an [`ObjectTask`].
///
/// `run` executes on the task's own thread while the owner of the
/// [`ObjectTask`] may concurrently reach the object through
/// [`ObjectTask::body`], hence the `Sync` bound.
pub trait Runnable: Send + Sync + 'static {
    /// The task body.
    ///
    /// Returning ends the task: with `task-delete` the thread deletes itself,
    /// otherwise it blocks forever.
    fn run(&self);
}

/// Lifecycle of an object task's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BodyState {
    /// `run` has not returned (it may not have started yet).
    Running = 0,
    /// `run` returned; the thread is deleted or parked for good.
    Returned = 1,
}

impl BodyState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Running,
            _ => Self::Returned,
        }
    }
}

struct Inner<T> {
    // Declared first so the thread is deleted before `body` is dropped.
    task: Task,
    state: AtomicU8,
    body: T,
}

/// A task running [`Runnable::run`] of the object it owns.
///
/// The object is placed on the heap before the thread is created, and its
/// address becomes the thread parameter, so the thread never sees a
/// partially built object. Derefs to [`Task`] for priority and suspend
/// control.
///
/// If the scheduler is already running and the new task has a higher
/// priority than the creator, its body may run (and even return) before
/// [`ObjectTask::spawn`] has stored the thread handle. `spawn` detects a body
/// that already returned and drops the stale handle, but a lower priority than
/// the creating task, or spawning before the scheduler starts, keeps the
/// start-up ordering predictable.
///
/// Dropping the `ObjectTask` deletes the thread (with `task-delete`) and then
/// the object. Without `task-delete` a created thread cannot be stopped, so
/// dropping the wrapper leaks the object together with its thread. Dropping
/// the wrapper while the body is in the middle of returning is a race the
/// caller must avoid.
///
/// # Example
///
/// ```rust,ignore
/// use core::sync::atomic::{AtomicU32, Ordering};
/// use kthread::{ObjectTask, PriorityTier, Runnable, config::MINIMAL_STACK_SIZE};
///
/// struct Counter(AtomicU32);
///
/// impl Runnable for Counter {
///     fn run(&self) {
///         loop {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
/// }
///
/// let counter = ObjectTask::spawn("counter", PriorityTier::Low, MINIMAL_STACK_SIZE, Counter(AtomicU32::new(0)));
/// let ticks = counter.body().0.load(Ordering::Relaxed);
/// ```
pub struct ObjectTask<T: Runnable> {
    inner: NonNull<Inner<T>>,
    _marker: PhantomData<Inner<T>>,
}

unsafe impl<T: Runnable> Send for ObjectTask<T> {}
unsafe impl<T: Runnable> Sync for ObjectTask<T> {}

impl<T: Runnable> ObjectTask<T> {
    /// Moves `body` to the heap and creates a thread running `body.run()`.
    ///
    /// The returned wrapper holds no thread if the scheduler failed to create
    /// one; check [`Task::is_created`] or use [`ObjectTask::try_spawn`].
    pub fn spawn(
        name: &'static str,
        priority: impl Into<TaskPriority>,
        stack_depth: u16,
        body: T,
    ) -> Self {
        let inner = Box::new(Inner {
            task: Task::unstarted(name),
            state: AtomicU8::new(BodyState::Running as u8),
            body,
        });
        let this = Self {
            inner: NonNull::from(Box::leak(inner)),
            _marker: PhantomData,
        };

        let param = this.inner.as_ptr().cast::<c_void>();
        let handle = this
            .inner()
            .task
            .start(trampoline::<T>, priority.into(), stack_depth, param);

        // The body already returned and released a handle that was not stored
        // yet; the thread is gone, so the stored copy is stale.
        if cfg!(feature = "task-delete") && handle.is_some() && this.state() == BodyState::Returned
        {
            this.inner().task.take_handle();
        }
        this
    }

    /// Like [`ObjectTask::spawn`], but reports a creation failure as an error.
    pub fn try_spawn(
        name: &'static str,
        priority: impl Into<TaskPriority>,
        stack_depth: u16,
        body: T,
    ) -> Result<Self> {
        let this = Self::spawn(name, priority, stack_depth, body);
        if this.state() == BodyState::Running && !this.is_created() {
            return Err(TaskError::CreateFailed { name });
        }
        Ok(this)
    }

    fn inner(&self) -> &Inner<T> {
        // SAFETY: `inner` comes from `Box::leak` in `spawn` and is only freed
        // in `drop`.
        unsafe { self.inner.as_ref() }
    }

    /// Returns the object the task runs.
    pub fn body(&self) -> &T {
        &self.inner().body
    }

    /// Returns whether the body has returned.
    pub fn state(&self) -> BodyState {
        BodyState::from_u8(self.inner().state.load(Ordering::SeqCst))
    }
}

impl<T: Runnable> Deref for ObjectTask<T> {
    type Target = Task;

    fn deref(&self) -> &Task {
        &self.inner().task
    }
}

impl<T: Runnable> Drop for ObjectTask<T> {
    fn drop(&mut self) {
        cfg_if::cfg_if! {
            if #[cfg(feature = "task-delete")] {
                // SAFETY: see `inner`. Dropping `Inner` deletes the thread
                // before the body goes away.
                drop(unsafe { Box::from_raw(self.inner.as_ptr()) });
            } else {
                if self.is_created() {
                    warn!(
                        "task {:?} cannot be deleted, leaking it with its object",
                        self.name()
                    );
                } else {
                    // SAFETY: see `inner`. No thread refers to the object.
                    drop(unsafe { Box::from_raw(self.inner.as_ptr()) });
                }
            }
        }
    }
}

/// Thread entry point of every `ObjectTask<T>`.
///
/// `param` is the `Inner<T>` built by `ObjectTask::<T>::spawn`; the type
/// parameter ties each instantiation to the only layout it is ever given.
extern "C" fn trampoline<T: Runnable>(param: *mut c_void) {
    debug_assert!(!param.is_null());
    // SAFETY: the object outlives its thread: `ObjectTask::drop` deletes the
    // thread before freeing it, or leaks it.
    let inner = unsafe { &*param.cast::<Inner<T>>() };

    inner.body.run();

    inner
        .state
        .store(BodyState::Returned as u8, Ordering::SeqCst);
    let name = inner.task.name();
    info!("task {:?}: body returned", name);

    cfg_if::cfg_if! {
        if #[cfg(feature = "task-delete")] {
            // The owner may free the object as soon as the handle is gone.
            inner.task.take_handle();
            crate_interface::call_interface!(crate::sched::SchedulerIf::delete, None);
            unreachable!("task {:?} kept running after deleting itself", name);
        } else {
            loop {
                crate_interface::call_interface!(
                    crate::sched::SchedulerIf::delay,
                    crate::config::MAX_DELAY
                );
            }
        }
    }
}
