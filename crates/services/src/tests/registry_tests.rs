use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use shared::error::ServiceError;

use super::{registry, ServiceRegistry};

struct Clock {
    ticks: AtomicU32,
}

struct Battery;

#[test]
fn register_twice_is_an_error() {
    let reg = ServiceRegistry::new();
    reg.register::<Battery>(|| Arc::new(Battery)).unwrap();
    assert!(matches!(
        reg.register::<Battery>(|| Arc::new(Battery)),
        Err(ServiceError::AlreadyRegistered { .. })
    ));
}

#[test]
fn ensure_runs_the_factory_once_and_memoizes() {
    let reg = ServiceRegistry::new();
    let runs = Arc::new(AtomicU32::new(0));
    reg.register::<Clock>({
        let runs = runs.clone();
        move || {
            runs.fetch_add(1, Ordering::SeqCst);
            Arc::new(Clock {
                ticks: AtomicU32::new(0),
            })
        }
    })
    .unwrap();

    let first = reg.ensure::<Clock>().unwrap();
    first.ticks.fetch_add(3, Ordering::SeqCst);
    let second = reg.ensure::<Clock>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.ticks.load(Ordering::SeqCst), 3);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn ensure_unregistered_kind_fails() {
    let reg = ServiceRegistry::new();
    assert!(matches!(
        reg.ensure::<Clock>(),
        Err(ServiceError::NotRegistered { .. })
    ));
}

#[test]
fn export_requires_registration_and_unique_names() {
    let reg = ServiceRegistry::new();
    assert!(matches!(
        reg.export::<Battery>("battery"),
        Err(ServiceError::NotRegistered { .. })
    ));

    reg.register::<Battery>(|| Arc::new(Battery)).unwrap();
    reg.export::<Battery>("battery").unwrap();
    assert!(reg.is_exported("battery"));
    assert!(!reg.is_exported("clock"));

    reg.register::<Clock>(|| {
        Arc::new(Clock {
            ticks: AtomicU32::new(0),
        })
    })
    .unwrap();
    assert!(matches!(
        reg.export::<Clock>("battery"),
        Err(ServiceError::ExportTaken { .. })
    ));
}

#[test]
fn process_registry_is_shared() {
    struct Marker;
    registry().register::<Marker>(|| Arc::new(Marker)).unwrap();
    let first = registry().ensure::<Marker>().unwrap();
    let second = registry().ensure::<Marker>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}
