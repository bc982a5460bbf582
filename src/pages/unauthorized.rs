//! Shown when a signed-in user lacks the permission a route requires.

use leptos::prelude::*;

use crate::util::auth::HOME_PATH;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <div class="unauthorized-page">
            <h1>"Access denied"</h1>
            <p>"Your account does not have permission to view this page."</p>
            <a class="btn" href=HOME_PATH>
                "Back to activities"
            </a>
        </div>
    }
}
