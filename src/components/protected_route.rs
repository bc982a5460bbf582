//! Route-level and element-level permission gates.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ProtectedRoute` wraps a routed page. It evaluates the current path
//! against the [`RouteRules`] in context and either renders the page,
//! shows a placeholder while the auth store hydrates, or navigates away.
//! `Can` hides a fragment from users lacking one permission. Both defer to
//! `util::auth` so they never disagree.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::auth::AuthStore;
use crate::util::auth::{Access, RouteRules, can, evaluate_route, full_path, remember_redirect};

/// Render `children` only when the signed-in user may enter the current
/// route. Unauthenticated visits record the attempted path before
/// navigating to the login page.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthStore>>();
    let rules = expect_context::<RouteRules>();
    let location = use_location();
    let (pathname, search, hash) = (location.pathname, location.search, location.hash);
    let navigate = use_navigate();

    let access = Memo::new(move |_| {
        let path = pathname.get();
        auth.with(|store| evaluate_route(store, &rules, &path))
    });

    Effect::new(move || {
        let decision = access.get();
        let Some(target) = decision.redirect_target() else {
            return;
        };
        if decision == Access::DeniedNotAuthenticated {
            let attempted = full_path(&pathname.get_untracked(), &search.get_untracked(), &hash.get_untracked());
            auth.with_untracked(|store| {
                if let Some(storage) = store.storage() {
                    remember_redirect(storage.as_ref(), &attempted);
                }
            });
        }
        navigate(target, NavigateOptions { replace: true, ..NavigateOptions::default() });
    });

    move || match access.get() {
        Access::Allowed => children().into_any(),
        Access::Checking => view! { <p class="route-guard route-guard--checking">"Checking access..."</p> }.into_any(),
        Access::DeniedNotAuthenticated | Access::DeniedInsufficientPermission => ().into_any(),
    }
}

/// Render `children` when the user holds `permission`, else `fallback`.
#[component]
pub fn Can(
    #[prop(into)] permission: String,
    children: ChildrenFn,
    #[prop(optional, into)] fallback: ViewFn,
) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthStore>>();
    let allowed = Memo::new(move |_| auth.with(|store| can(store, &permission)));

    move || if allowed.get() { children().into_any() } else { fallback.run() }
}
