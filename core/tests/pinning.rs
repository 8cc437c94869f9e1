//! End-to-end pinning behavior against the live OS scheduler.
//!
//! Each test binds a thread it owns (spawned or the harness thread for that
//! test), so tests stay independent under the default parallel runner.

#![cfg(any(target_os = "linux", target_os = "android"))]

use corepin_core::{
    bind_current_thread, bind_current_thread_to_cpu, cpu_count, cpu_ids, current_affinity,
    spawn_pinned, AffinityError, CpuId,
};

use std::sync::mpsc;
use std::thread;

// Comfortably past any real CPU index and past the mask capacity.
const BOGUS_CPU: u32 = 10_000;

#[test]
fn cpu_count_matches_enumeration() {
    assert_eq!(cpu_count().unwrap(), cpu_ids().unwrap().len());
}

#[test]
fn binds_every_available_cpu() {
    thread::spawn(|| {
        for cpu in cpu_ids().unwrap() {
            bind_current_thread(cpu).unwrap();
            assert_eq!(current_affinity().unwrap(), vec![cpu]);
        }
    })
    .join()
    .unwrap();
}

#[test]
fn rebinding_same_cpu_is_idempotent() {
    thread::spawn(|| {
        let cpu = cpu_ids().unwrap()[0];
        bind_current_thread(cpu).unwrap();
        bind_current_thread(cpu).unwrap();
        assert_eq!(current_affinity().unwrap(), vec![cpu]);
    })
    .join()
    .unwrap();
}

#[test]
fn rebinding_replaces_the_previous_cpu() {
    thread::spawn(|| {
        let cpus = cpu_ids().unwrap();
        if cpus.len() < 2 {
            return;
        }
        bind_current_thread(cpus[0]).unwrap();
        bind_current_thread(cpus[1]).unwrap();
        // Exactly {b}, not {a, b}.
        assert_eq!(current_affinity().unwrap(), vec![cpus[1]]);
    })
    .join()
    .unwrap();
}

#[test]
fn out_of_range_index_leaves_affinity_unchanged() {
    thread::spawn(|| {
        let cpu = cpu_ids().unwrap()[0];
        bind_current_thread(cpu).unwrap();
        let before = current_affinity().unwrap();

        let err = bind_current_thread(CpuId(BOGUS_CPU)).unwrap_err();
        assert!(matches!(err, AffinityError::InvalidCpu(_)));
        assert_ne!(err.os_code(), 0);

        assert_eq!(current_affinity().unwrap(), before);
    })
    .join()
    .unwrap();
}

#[test]
fn binding_does_not_affect_sibling_threads() {
    let cpus = cpu_ids().unwrap();
    let (ready_tx, ready_rx) = mpsc::channel();
    let (done_tx, done_rx) = mpsc::channel();

    let observer = thread::spawn(move || {
        let before = current_affinity().unwrap();
        ready_tx.send(()).unwrap();
        done_rx.recv().unwrap();
        assert_eq!(current_affinity().unwrap(), before);
    });

    let binder = thread::spawn(move || {
        ready_rx.recv().unwrap();
        bind_current_thread(cpus[0]).unwrap();
        done_tx.send(()).unwrap();
    });

    binder.join().unwrap();
    observer.join().unwrap();
}

#[test]
fn integer_contract_reports_zero_and_errno() {
    thread::spawn(|| {
        let cpu = cpu_ids().unwrap()[0];
        assert_eq!(bind_current_thread_to_cpu(cpu.raw() as i32), 0);
        assert_eq!(current_affinity().unwrap(), vec![cpu]);

        let too_big = bind_current_thread_to_cpu(BOGUS_CPU as i32);
        let negative = bind_current_thread_to_cpu(-1);
        assert_ne!(too_big, 0);
        // A negative index reports the same code as any other out-of-range one.
        assert_eq!(negative, too_big);

        assert_eq!(current_affinity().unwrap(), vec![cpu]);
    })
    .join()
    .unwrap();
}

#[test]
fn spawned_worker_runs_on_its_cpu() {
    let cpu = cpu_ids().unwrap()[0];
    let observed = spawn_pinned(cpu, "pinned-worker", move || current_affinity().unwrap())
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(observed, vec![cpu]);
}
