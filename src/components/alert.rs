//! Dismissable error alert.

use leptos::prelude::*;

/// Shows `message` while it is `Some`, with a close button that runs
/// `on_dismiss`.
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>, on_dismiss: Callback<()>) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div class="alert alert--error" role="alert">
                    <span class="alert__message">{text}</span>
                    <button
                        class="alert__dismiss"
                        type="button"
                        aria-label="Dismiss"
                        on:click=move |_| on_dismiss.run(())
                    >
                        "×"
                    </button>
                </div>
            }
        })
    }
}
