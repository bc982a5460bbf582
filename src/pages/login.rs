//! Login page: email + password against `POST /auth/login`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::form::{Form, submit_handler};
use crate::net::api::ApiClient;
use crate::net::resources;
use crate::net::types::LoginRequest;
use crate::state::auth::AuthStore;
use crate::util::auth::{post_login_destination, take_redirect};
use crate::util::form::{FieldKind, FieldSpec, FormValues};

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn login_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("email", "Email").kind(FieldKind::Email).required().email(),
        FieldSpec::new("password", "Password").kind(FieldKind::Password).required().min_length(MIN_PASSWORD_LEN),
    ]
}

/// Credentials from validated form values. The email is trimmed; the
/// password is sent as typed.
pub(crate) fn credentials(values: &FormValues) -> LoginRequest {
    LoginRequest {
        email: values.get("email").map(|v| v.trim().to_owned()).unwrap_or_default(),
        password: values.get("password").cloned().unwrap_or_default(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthStore>>();
    let api = expect_context::<ApiClient>();
    let navigate = use_navigate();

    // Leave as soon as a session exists, whether restored or just created.
    Effect::new(move || {
        if !auth.with(AuthStore::is_logged_in) {
            return;
        }
        let marker = auth.with_untracked(|store| store.storage().and_then(|s| take_redirect(s.as_ref())));
        navigate(&post_login_destination(marker), NavigateOptions { replace: true, ..NavigateOptions::default() });
    });

    let on_submit = submit_handler(move |values| {
        let api = api.clone();
        async move {
            let response = resources::login(&api, &credentials(&values)).await.map_err(|e| e.message)?;
            tracing::info!(user_id = %response.user.id, "signed in");
            auth.update(|store| store.login(response.user, response.token));
            Ok(())
        }
    });

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Movement Portal"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <Form fields=login_fields() on_submit=on_submit submit_label="Sign in"/>
            </div>
        </div>
    }
}
