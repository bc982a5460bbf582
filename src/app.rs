//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the per-application services once and shares them through
//! Leptos context:
//! - `RwSignal<AuthStore>` over browser localStorage, hydrated on mount
//! - `ApiClient` reading its bearer token from the store
//! - `ImageStorage` for uploads
//! - `RouteRules` consumed by `ProtectedRoute`
//!
//! A 403 from the API reaches the client's session listener here, which ends
//! the session and leaves for the login page.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::protected_route::{Can, ProtectedRoute};
use crate::config::AppConfig;
use crate::net::api::ApiClient;
use crate::net::images::ImageStorage;
use crate::net::transport::default_transport;
use crate::pages::{
    activities::ActivitiesPage, activity::ActivityPage, admin_categories::AdminCategoriesPage, login::LoginPage,
    unauthorized::UnauthorizedPage,
};
use crate::state::auth::AuthStore;
use crate::util::auth::{LOGIN_PATH, apply_session_event};
use crate::util::storage::BrowserStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="he" dir="rtl">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Full-page navigation, dropping all in-memory client state.
fn hard_redirect(path: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(path) {
                tracing::warn!(error = ?e, %path, "redirect failed");
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        tracing::debug!(%path, "redirect skipped outside the browser");
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::from_build_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid build configuration; using defaults");
        AppConfig::default()
    });

    let auth = RwSignal::new(AuthStore::new(BrowserStorage::local()));
    // Effects only run in the browser, so the server always renders the
    // pre-hydration state.
    Effect::new(move || auth.update(AuthStore::hydrate));

    let transport = default_transport();
    let api = ApiClient::new(&config.api_base_url, transport.clone())
        .with_token_source(move || auth.try_with_untracked(|store| store.token().map(str::to_owned)).flatten())
        .on_session_event(move |event| {
            if let Some(target) = auth.try_update(|store| apply_session_event(store, &event)).flatten() {
                hard_redirect(target);
            }
        });
    let images = ImageStorage::new(&config.storage_bucket, transport);

    provide_context(auth);
    provide_context(api);
    provide_context(images);
    provide_context(config.route_rules);

    view! {
        <Stylesheet id="leptos" href="/pkg/portal.css"/>
        <Title text="Movement Portal"/>

        <Router>
            <NavBar/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("unauthorized") view=UnauthorizedPage/>
                    <Route
                        path=StaticSegment("")
                        view=|| view! { <ProtectedRoute><ActivitiesPage/></ProtectedRoute> }
                    />
                    <Route
                        path=(StaticSegment("activities"), ParamSegment("id"))
                        view=|| view! { <ProtectedRoute><ActivityPage/></ProtectedRoute> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("categories"))
                        view=|| view! { <ProtectedRoute><AdminCategoriesPage/></ProtectedRoute> }
                    />
                </Routes>
            </main>
        </Router>
    }
}

/// Top bar: signed-in user's name, admin link, logout.
#[component]
fn NavBar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthStore>>();
    let user_name = move || auth.with(|store| store.user().map(|u| u.display_name()));

    let on_logout = move |_| {
        auth.update(AuthStore::logout);
        hard_redirect(LOGIN_PATH);
    };

    view! {
        <nav class="navbar">
            <a class="navbar__brand" href="/">
                "Movement Portal"
            </a>
            <Can permission="manage_categories">
                <a class="navbar__link" href="/admin/categories">
                    "Admin"
                </a>
            </Can>
            {move || {
                user_name()
                    .map(|name| {
                        view! {
                            <span class="navbar__user">{name}</span>
                            <button class="btn navbar__logout" on:click=on_logout>
                                "Log out"
                            </button>
                        }
                    })
            }}
        </nav>
    }
}
