//! A recording scheduler backed by std threads.
//!
//! Threads are only started when a test calls [`start`], which plays the part
//! of the scheduler picking the task. Every handle owns its own [`Record`], so
//! tests can run in parallel.
//!
//! Name prefixes change the behaviour of `create`:
//!
//! - `fail`: creation fails.
//! - `eager`: the thread runs (and its body returns) before `create` returns,
//!   like a higher-priority task preempting its creator.

#![allow(dead_code)]

use std::{
    cell::Cell,
    collections::BTreeMap,
    ffi::c_void,
    ptr::NonNull,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use kthread::{RawTaskHandle, SchedulerIf, TaskFn};

/// Delays a parked-forever thread performs before it stops returning.
pub const DELAYS_BEFORE_PARK: usize = 3;

#[derive(Debug, Clone)]
pub struct Record {
    pub name: String,
    pub entry: TaskFn,
    pub param: usize,
    pub stack_depth: u16,
    pub priority: usize,
    pub deletes: usize,
    pub self_deleted: bool,
    pub suspends: usize,
    pub resumes: usize,
    pub isr_results: Vec<bool>,
    pub delays: Vec<u32>,
    pub entry_returned: bool,
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
static TASKS: Mutex<BTreeMap<usize, Record>> = Mutex::new(BTreeMap::new());

thread_local! {
    static CURRENT: Cell<usize> = const { Cell::new(0) };
}

fn id_of(task: Option<RawTaskHandle>) -> usize {
    match task {
        Some(raw) => raw.as_ptr() as usize,
        None => CURRENT.with(Cell::get),
    }
}

fn update<R>(id: usize, f: impl FnOnce(&mut Record) -> R) -> R {
    let mut tasks = TASKS.lock().unwrap();
    let record = tasks.get_mut(&id).expect("unknown task handle");
    f(record)
}

fn park_forever() -> ! {
    loop {
        thread::park();
    }
}

/// Returns a snapshot of everything the scheduler saw for `task`.
pub fn record(task: RawTaskHandle) -> Record {
    TASKS.lock().unwrap()[&id_of(Some(task))].clone()
}

/// Runs the thread of `task`, as the scheduler would once it is picked.
pub fn start(task: RawTaskHandle) {
    spawn_thread(id_of(Some(task)));
}

fn spawn_thread(id: usize) {
    let (entry, param) = update(id, |r| (r.entry, r.param));
    thread::spawn(move || {
        CURRENT.with(|current| current.set(id));
        entry(param as *mut c_void);
        update(id, |r| r.entry_returned = true);
    });
}

/// Polls the record of `id` until `done` holds.
fn wait_id(id: usize, done: impl Fn(&Record) -> bool) -> Record {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let record = TASKS.lock().unwrap()[&id].clone();
        if done(&record) {
            return record;
        }
        assert!(Instant::now() < deadline, "timed out waiting on {:?}", record.name);
        thread::sleep(Duration::from_millis(1));
    }
}

/// Polls the record of `task` until `done` holds.
pub fn wait_until(task: RawTaskHandle, done: impl Fn(&Record) -> bool) -> Record {
    wait_id(id_of(Some(task)), done)
}

/// Returns `true` once the thread is parked in its final resting place.
pub fn finished(record: &Record) -> bool {
    record.self_deleted || record.delays.len() >= DELAYS_BEFORE_PARK
}

struct MockScheduler;

#[crate_interface::impl_interface]
impl SchedulerIf for MockScheduler {
    fn create(
        entry: TaskFn,
        name: &str,
        stack_depth: u16,
        param: *mut c_void,
        priority: usize,
    ) -> Option<RawTaskHandle> {
        if name.starts_with("fail") {
            return None;
        }
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        TASKS.lock().unwrap().insert(
            id,
            Record {
                name: name.into(),
                entry,
                param: param as usize,
                stack_depth,
                priority,
                deletes: 0,
                self_deleted: false,
                suspends: 0,
                resumes: 0,
                isr_results: Vec::new(),
                delays: Vec::new(),
                entry_returned: false,
            },
        );
        if name.starts_with("eager") {
            spawn_thread(id);
            wait_id(id, finished);
        }
        NonNull::new(id as *mut c_void)
    }

    fn delete(task: Option<RawTaskHandle>) {
        let id = id_of(task);
        update(id, |r| {
            r.deletes += 1;
            r.self_deleted |= task.is_none();
        });
        if task.is_none() {
            park_forever();
        }
    }

    fn priority_get(task: Option<RawTaskHandle>) -> usize {
        update(id_of(task), |r| r.priority)
    }

    fn priority_set(task: Option<RawTaskHandle>, priority: usize) {
        update(id_of(task), |r| r.priority = priority);
    }

    fn suspend(task: Option<RawTaskHandle>) {
        update(id_of(task), |r| r.suspends += 1);
    }

    fn resume(task: Option<RawTaskHandle>) {
        update(id_of(task), |r| r.resumes += 1);
    }

    fn resume_from_isr(task: Option<RawTaskHandle>) -> bool {
        update(id_of(task), |r| {
            // Alternate so the caller cannot pass with a constant.
            let switch = r.isr_results.len() % 2 == 0;
            r.isr_results.push(switch);
            switch
        })
    }

    fn delay(ticks: u32) {
        let id = CURRENT.with(Cell::get);
        let delays = update(id, |r| {
            r.delays.push(ticks);
            r.delays.len()
        });
        if delays >= DELAYS_BEFORE_PARK {
            park_forever();
        }
    }
}
