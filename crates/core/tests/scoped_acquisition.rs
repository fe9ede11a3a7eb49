mod common;

use common::*;
use restbind_api::{HostError, Scope};
use restbind_core::host::{ContextBehaviour, HostEvent, InMemoryHost, StaticApplication};
use restbind_core::resolver::AcquiredApplication;
use restbind_core::{AssemblyError, AssemblyPass};

fn single_application_pass() -> AssemblyPass {
    let mut pass = AssemblyPass::default();
    scan(
        &mut pass,
        &[application_type("a.App")],
        vec![application_bean("a.App", &[])],
    );
    pass
}

#[test]
fn contextual_instance_is_destroyed_through_its_context() {
    let host = InMemoryHost::new()
        .with_application("a.App", StaticApplication::default())
        .with_context(Scope::APPLICATION, ContextBehaviour::Active);

    single_application_pass().assemble(&host).unwrap();

    assert_eq!(
        host.events(),
        vec![
            HostEvent::ContextGet(name("a.App")),
            HostEvent::ContextDestroyed(name("a.App")),
        ]
    );
    assert_eq!(host.live_instances(), 0);
}

#[test]
fn without_a_context_the_instance_is_constructed() {
    let host = InMemoryHost::new().with_application("a.App", StaticApplication::default());

    single_application_pass().assemble(&host).unwrap();

    assert_eq!(
        host.events(),
        vec![
            HostEvent::Created(name("a.App")),
            HostEvent::Destroyed(name("a.App")),
        ]
    );
}

#[test]
fn inactive_context_falls_back_to_construction() {
    let host = InMemoryHost::new()
        .with_application("a.App", StaticApplication::default())
        .with_context(Scope::APPLICATION, ContextBehaviour::Inactive);

    single_application_pass().assemble(&host).unwrap();

    assert_eq!(
        host.events(),
        vec![
            HostEvent::Created(name("a.App")),
            HostEvent::Destroyed(name("a.App")),
        ]
    );
}

#[test]
fn unsupported_destroy_is_not_an_error() {
    let host = InMemoryHost::new()
        .with_application("a.App", StaticApplication::default())
        .with_context(Scope::APPLICATION, ContextBehaviour::NoExplicitDestroy);

    let outcome = single_application_pass().assemble(&host);

    assert!(outcome.is_ok());
    assert_eq!(
        host.events(),
        vec![
            HostEvent::ContextGet(name("a.App")),
            HostEvent::ContextDestroyRejected(name("a.App")),
        ]
    );
}

#[test]
fn other_destroy_failures_abort_the_pass() {
    let host = InMemoryHost::new()
        .with_application("a.App", StaticApplication::default())
        .with_context(Scope::APPLICATION, ContextBehaviour::FailingDestroy);

    let err = single_application_pass().assemble(&host).unwrap_err();

    assert!(matches!(err, AssemblyError::Host(HostError::Internal(_))));
    // Released exactly once: the failed destroy is not retried on drop.
    assert_eq!(
        host.events(),
        vec![
            HostEvent::ContextGet(name("a.App")),
            HostEvent::ContextDestroyFailed(name("a.App")),
        ]
    );
    assert_eq!(host.live_instances(), 0);
}

#[test]
fn failure_while_processing_classes_still_releases() {
    // The declared class is unknown to the host, so reading it fails.
    let host = InMemoryHost::new()
        .with_application("a.App", StaticApplication::new([name("a.Missing")]))
        .with_context(Scope::APPLICATION, ContextBehaviour::Active);

    let err = single_application_pass().assemble(&host).unwrap_err();

    assert!(matches!(err, AssemblyError::Host(HostError::UnknownType(ref t)) if *t == name("a.Missing")));
    assert_eq!(host.live_instances(), 0);
    assert_eq!(
        host.events().last(),
        Some(&HostEvent::ContextDestroyed(name("a.App")))
    );
}

#[test]
fn creation_failure_aborts_the_pass() {
    let host = InMemoryHost::new()
        .with_application("a.App", StaticApplication::default())
        .failing("a.App");

    let err = single_application_pass().assemble(&host).unwrap_err();

    assert!(matches!(err, AssemblyError::Host(HostError::Creation { .. })));
    assert!(host.events().is_empty());
}

#[test]
fn dropped_guard_releases_the_instance() {
    let host = InMemoryHost::new().with_application("a.App", StaticApplication::default());
    let bean = application_bean("a.App", &[]);

    {
        let acquired = AcquiredApplication::acquire(&host, &bean).unwrap();
        assert!(!acquired.is_contextual());
        assert_eq!(host.live_instances(), 1);
    }

    assert_eq!(host.live_instances(), 0);
}

#[test]
fn explicit_release_happens_once() {
    let host = InMemoryHost::new()
        .with_application("a.App", StaticApplication::default())
        .with_context(Scope::APPLICATION, ContextBehaviour::Active);
    let bean = application_bean("a.App", &[]);

    let acquired = AcquiredApplication::acquire(&host, &bean).unwrap();
    assert!(acquired.is_contextual());
    acquired.release().unwrap();

    assert_eq!(
        host.events(),
        vec![
            HostEvent::ContextGet(name("a.App")),
            HostEvent::ContextDestroyed(name("a.App")),
        ]
    );
}

#[test]
fn singletons_are_ignored() {
    let mut application = StaticApplication::default();
    application.singletons.push(name("a.SingletonProvider"));
    let host = InMemoryHost::new().with_application("a.App", application);

    let outcome = single_application_pass().assemble(&host).unwrap();

    assert!(outcome.registrations.is_empty());
}
