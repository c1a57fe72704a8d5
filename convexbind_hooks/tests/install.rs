mod common;

use common::{CONNECTED, FakeClient, app_with};
use convexbind::ConfigError;
use convexbind_hooks::{
    App, ConvexPlugin, HookError, InjectionKey, create_convex, try_use_convex, use_convex,
    use_query,
};

#[test]
fn test_create_convex_connects_once_with_validated_origin() {
    let mut app = App::new();
    app.use_plugin(create_convex::<FakeClient>(
        "https://install-test-1.convex.cloud/",
    ))
    .expect("Failed to install");

    let connected = CONNECTED.lock().unwrap().clone();
    assert_eq!(
        connected
            .iter()
            .filter(|o| o.as_str() == "https://install-test-1.convex.cloud")
            .count(),
        1
    );

    let scope = app.mount();
    let data = use_query(&scope, "counter:get", None);
    assert_eq!(data.get(), None);
}

#[test]
fn test_create_convex_rejects_bad_origin() {
    let mut app = App::new();
    let err = app
        .use_plugin(create_convex::<FakeClient>("ftp://install-test-2"))
        .err()
        .expect("origin should be rejected");
    assert!(matches!(
        err,
        HookError::Config(ConfigError::InvalidScheme(_))
    ));
    assert!(matches!(
        try_use_convex(&app.mount()),
        Err(HookError::ContextMissing)
    ));
}

#[test]
fn test_second_install_is_rejected() {
    let client = FakeClient::new();
    let mut app = app_with(&client);
    let err = app
        .use_plugin(create_convex::<FakeClient>(
            "https://install-test-3.convex.cloud",
        ))
        .err()
        .expect("second install should fail");
    assert!(matches!(err, HookError::AlreadyInstalled));
    assert!(
        !CONNECTED
            .lock()
            .unwrap()
            .iter()
            .any(|o| o == "https://install-test-3.convex.cloud")
    );
}

#[test]
fn test_try_use_convex_without_install() {
    let app = App::new();
    let scope = app.mount();
    assert!(matches!(
        try_use_convex(&scope),
        Err(HookError::ContextMissing)
    ));
}

#[test]
fn test_use_convex_returns_installed_client() {
    let client = FakeClient::new();
    let app = app_with(&client);
    let scope = app.mount().child();
    let installed = use_convex(&scope);
    assert_eq!(
        std::sync::Arc::as_ptr(&installed) as *const (),
        std::sync::Arc::as_ptr(&client) as *const ()
    );
}

#[test]
fn test_app_provide_reaches_scopes() {
    const LOCALE: InjectionKey<&'static str> = InjectionKey::new("locale");
    let mut app = App::new();
    app.provide(&LOCALE, "en")
        .use_plugin(ConvexPlugin::with_client(FakeClient::new()))
        .expect("Failed to install");
    let scope = app.mount();
    assert_eq!(scope.inject(&LOCALE), Some("en"));
    assert!(try_use_convex(&scope).is_ok());
}
