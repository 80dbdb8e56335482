//! Architecture contract tests.

mod support;

use support::architecture::{find_lines_containing, path_exists, read_relative};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "diesel::",
            "teloxide::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter", "crate::infrastructure", "crate::application"],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn application_does_not_reach_into_adapters() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::adapter", "crate::infrastructure", "diesel::", "teloxide::"],
    );

    assert!(
        hits.is_empty(),
        "application layer should use ports, not adapters: {hits:#?}"
    );
}

#[test]
fn telegram_client_is_confined_to_its_adapter() {
    let hits = find_lines_containing("src", &["teloxide::"]);
    let outside: Vec<_> = hits
        .into_iter()
        .filter(|(path, _, _)| path != "src/adapter/outbound/notifier/telegram.rs")
        .collect();

    assert!(
        outside.is_empty(),
        "teloxide used outside the telegram adapter: {outside:#?}"
    );
}

#[test]
fn dispatcher_state_has_no_ambient_globals() {
    let hits = find_lines_containing(
        "src/application/signal",
        &["static mut", "lazy_static", "OnceLock", "thread_local!"],
    );

    assert!(
        hits.is_empty(),
        "signal state must be passed explicitly: {hits:#?}"
    );
}

#[test]
fn telegram_adapter_is_feature_gated() {
    let notifier = read_relative("src/adapter/outbound/notifier/mod.rs");
    assert!(
        notifier.contains("#[cfg(feature = \"telegram\")]"),
        "telegram notifier module should be behind the telegram feature"
    );
}

#[test]
fn migrations_ship_with_the_crate() {
    assert!(path_exists("migrations"), "embedded migrations directory is missing");
}
