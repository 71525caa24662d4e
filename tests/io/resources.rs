// Integration tests for src/io/resources.rs: pool creation, frame resets and
// handle lifetime, observed through the instrumented stub backend.

use zbatch::engine::{Backend, Zstd};
use zbatch::io::{ErrorKind, Prefs, ResourcePool};

use crate::support::{Fault, Toy};

#[test]
fn pool_takes_backend_sizes_and_one_handle() {
    let toy = Toy::new(64, 96);
    let pool = ResourcePool::create(&toy).unwrap();
    assert_eq!(pool.input_capacity(), 64);
    assert_eq!(pool.output_capacity(), 96);
    assert_eq!(pool.backend_name(), "toy");
    assert_eq!(toy.counters.created.get(), 1);
    assert_eq!(toy.counters.dropped.get(), 0);

    pool.destroy();
    assert_eq!(toy.counters.dropped.get(), 1);
}

#[test]
fn dropping_pool_releases_handle() {
    let toy = Toy::new(8, 8);
    {
        let _pool = ResourcePool::create(&toy).unwrap();
    }
    assert_eq!(toy.counters.created.get(), 1);
    assert_eq!(toy.counters.dropped.get(), 1);
}

#[test]
fn handle_creation_failure_is_resource_exhausted() {
    let toy = Toy::new(8, 8).fault(Fault::CreateFails);
    let err = ResourcePool::create(&toy).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
    assert!(err.detail().contains("out of handles"), "{}", err);
    assert_eq!(toy.counters.created.get(), 0);
}

#[test]
fn zero_sized_backend_buffer_is_rejected() {
    let toy = Toy::new(16, 0);
    let err = ResourcePool::create(&toy).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
    assert_eq!(toy.counters.created.get(), 0);
}

#[test]
fn begin_frame_failure_is_engine_init_failed() {
    let toy = Toy::new(8, 8).fault(Fault::InitFails);
    let mut pool = ResourcePool::create(&toy).unwrap();
    let err = pool.begin_frame(3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EngineInitFailed);
    assert_eq!(pool.frames_started(), 0);
}

#[test]
fn begin_frame_reuses_the_same_handle() {
    let toy = Toy::new(8, 8);
    let mut pool = ResourcePool::create(&toy).unwrap();
    for _ in 0..5 {
        pool.begin_frame(1).unwrap();
    }
    assert_eq!(pool.frames_started(), 5);
    assert_eq!(toy.counters.frames.get(), 5);
    assert_eq!(toy.counters.created.get(), 1);
}

#[test]
fn prefs_override_input_capacity_only() {
    let z = Zstd::new();
    let mut prefs = Prefs::default();
    prefs.set_input_buffer_size(777);
    let pool = ResourcePool::from_prefs(&z, &prefs).unwrap();
    assert_eq!(pool.input_capacity(), 777);
    assert_eq!(pool.output_capacity(), z.recommended_output_size());
}
