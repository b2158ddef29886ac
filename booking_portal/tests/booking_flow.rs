mod support;

use booking_portal::PortalConfig;
use booking_portal::domain::{FormField, Route};
use booking_portal::frameworks::config::{SUPABASE_ANON_KEY, SUPABASE_URL};
use booking_portal::frameworks::runtime::build_state;
use booking_portal::interface_adapters::state::PortalState;
use booking_portal::use_cases::{DialogState, SignUpForm};
use support::{ANON_KEY, JANE_EMAIL, PASSWORD, StubBackend};

fn portal(backend: &StubBackend) -> PortalState {
    let base_url = backend.base_url.to_string();
    let config = PortalConfig::from_lookup(|key| match key {
        SUPABASE_URL => Some(base_url.clone()),
        SUPABASE_ANON_KEY => Some(ANON_KEY.to_string()),
        _ => None,
    })
    .expect("config resolves");
    build_state(&config).expect("state builds")
}

fn next_week() -> String {
    (chrono::Local::now().date_naive() + chrono::Days::new(7))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn when_signed_in_user_books_a_safari_then_itinerary_request_is_posted() {
    let backend = support::spawn_backend().await;
    let state = portal(&backend);
    state.auth_flow().sign_in(JANE_EMAIL, PASSWORD).await.expect("sign-in");
    let mut desk = state.booking_desk();

    desk.open_safari_booking(state.catalog.safari(1)).await;
    let view = desk.view().expect("dialog open");
    assert_eq!(view.state, DialogState::Form);
    assert_eq!(view.draft.name, "Jane Doe");
    assert_eq!(view.draft.email, JANE_EMAIL);
    assert_eq!(view.draft.phone, "+254700000000");

    desk.edit(FormField::Date, next_week());
    desk.edit(FormField::GroupSize, "3");
    desk.submit().await;

    let view = desk.view().expect("dialog open");
    assert_eq!(view.state, DialogState::Success);
    let request = &backend.requests_to("/functions/v1/request-itinerary")[0];
    assert_eq!(request.header("authorization"), Some("Bearer jane-token"));
    assert_eq!(request.body["safari_id"], 1);
    assert_eq!(request.body["mode"], "book");
    assert_eq!(request.body["group_size"], 3);
    assert_eq!(request.body["start_date"], next_week());
}

#[tokio::test]
async fn when_signed_in_then_metadata_is_synced_and_profile_route_is_shown() {
    let backend = support::spawn_backend().await;
    let state = portal(&backend);
    let mut routes = state.navigator.subscribe();

    state.auth_flow().sign_in(JANE_EMAIL, PASSWORD).await.expect("sign-in");

    routes.changed().await.expect("navigator alive");
    assert_eq!(*routes.borrow(), Route::Profile);
    let sync = &backend.requests_to("/functions/v1/upsert-profile")[0];
    assert_eq!(sync.body["first_name"], "Jane");
    assert_eq!(sync.body["country"], serde_json::Value::Null);
    assert_eq!(sync.body["location"], serde_json::Value::Null);
}

#[tokio::test]
async fn when_signed_out_visitor_requests_a_viewing_then_login_is_required() {
    let backend = support::spawn_backend().await;
    let state = portal(&backend);
    let mut desk = state.booking_desk();

    desk.open_viewing(state.catalog.property(2)).await;

    assert_eq!(desk.view().map(|view| view.state), Some(DialogState::AuthRequired));
    assert!(desk.go_to_login());
    assert_eq!(state.navigator.current(), Route::Auth);
    assert!(backend.requests_to("/functions/v1/request-viewing").is_empty());
}

#[tokio::test]
async fn when_profile_is_saved_then_row_is_upserted_for_the_user() {
    let backend = support::spawn_backend().await;
    let state = portal(&backend);
    state.auth_flow().sign_in(JANE_EMAIL, PASSWORD).await.expect("sign-in");
    let editor = state.profile_editor();

    let mut view = editor.load().await.expect("profile loads");
    assert!(view.exists);
    view.form.about = "Planning a migration safari".to_string();
    let message = editor.save(&view.form).await.expect("profile saves");

    assert_eq!(message, "Profile saved");
    let upsert = backend
        .requests_to("/rest/v1/profiles")
        .into_iter()
        .find(|request| request.method == axum::http::Method::POST)
        .expect("upsert captured");
    assert_eq!(upsert.body["about"], "Planning a migration safari");
    assert_eq!(upsert.body["preference"], "safari");
}

#[tokio::test]
async fn when_sign_up_lacks_names_then_provider_is_not_called() {
    let backend = support::spawn_backend().await;
    let state = portal(&backend);

    let result = state
        .auth_flow()
        .sign_up(SignUpForm {
            email: "new@example.com".to_string(),
            password: PASSWORD.to_string(),
            ..Default::default()
        })
        .await;

    assert_eq!(
        result.map_err(|err| err.to_string()),
        Err("Please fill all fields".to_string())
    );
    assert!(backend.requests_to("/auth/v1/signup").is_empty());
}
