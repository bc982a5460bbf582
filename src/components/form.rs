//! Declarative form component.
//!
//! DESIGN
//! ======
//! Renders one control per [`FieldSpec`], keeps a [`FormState`] in a signal
//! and hands validated values to an async [`SubmitHandler`]. The component
//! performs no network I/O itself; pages decide what a submission does.
//! A handler error becomes the form-level message.

use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use leptos::prelude::*;

use crate::components::alert::ErrorAlert;
use crate::util::form::{FieldKind, FieldSpec, FormState, FormValues};

/// Async submit callback. `Err` carries the user-facing message.
pub type SubmitHandler = Rc<dyn Fn(FormValues) -> LocalBoxFuture<'static, Result<(), String>>>;

/// Wrap an async closure as a [`SubmitHandler`].
pub fn submit_handler<F, Fut>(handler: F) -> SubmitHandler
where
    F: Fn(FormValues) -> Fut + 'static,
    Fut: Future<Output = Result<(), String>> + 'static,
{
    Rc::new(move |values| handler(values).boxed_local())
}

#[component]
pub fn Form(
    fields: Vec<FieldSpec>,
    on_submit: SubmitHandler,
    #[prop(into)] submit_label: String,
    #[prop(optional)] initial: FormValues,
    /// Restore `initial` after a successful submission.
    #[prop(optional)]
    reset_on_success: bool,
) -> impl IntoView {
    let state = RwSignal::new(FormState::new(&fields, &initial));
    let fields = StoredValue::new(fields);
    let initial = StoredValue::new(initial);

    let on_form_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(Ok(values)) = state.try_update(|s| fields.with_value(|f| s.begin_submit(f))) else {
            return;
        };

        #[cfg(feature = "hydrate")]
        {
            let handler = on_submit.clone();
            leptos::task::spawn_local(async move {
                let outcome = handler(values).await;
                let ok = outcome.is_ok();
                state.update(|s| s.finish_submit(outcome));
                if ok && reset_on_success {
                    state.set(fields.with_value(|f| initial.with_value(|init| FormState::new(f, init))));
                }
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (values, &on_submit, reset_on_success, initial);
            state.update(|s| s.submitting = false);
        }
    };

    let controls = fields.with_value(|specs| specs.iter().map(|spec| field_control(spec, state)).collect::<Vec<_>>());
    let submitting = move || state.with(|s| s.submitting);

    view! {
        <form class="form" on:submit=on_form_submit novalidate=true>
            <ErrorAlert
                message=Signal::derive(move || state.with(|s| s.form_error.clone()))
                on_dismiss=Callback::new(move |()| state.update(|s| s.form_error = None))
            />
            {controls}
            <button class="btn btn--primary form__submit" type="submit" disabled=submitting>
                {move || if submitting() { "Submitting...".to_owned() } else { submit_label.clone() }}
            </button>
        </form>
    }
}

fn field_control(spec: &FieldSpec, state: RwSignal<FormState>) -> impl IntoView + use<> {
    let id = format!("field-{}", spec.name);
    let read_name = spec.name.clone();
    let write_name = spec.name.clone();
    let error_name = spec.name.clone();
    let value = move || state.with(|s| s.value(&read_name).to_owned());

    let control = if spec.kind == FieldKind::TextArea {
        view! {
            <textarea
                id=id.clone()
                name=spec.name.clone()
                class="form-field__input"
                prop:value=value
                on:input=move |ev| state.update(|s| s.set_value(&write_name, event_target_value(&ev)))
            ></textarea>
        }
        .into_any()
    } else {
        view! {
            <input
                id=id.clone()
                name=spec.name.clone()
                class="form-field__input"
                type=spec.kind.input_type()
                prop:value=value
                on:input=move |ev| state.update(|s| s.set_value(&write_name, event_target_value(&ev)))
            />
        }
        .into_any()
    };

    view! {
        <div class="form-field">
            <label class="form-field__label" for=id>
                {spec.label.clone()}
                {spec.required.then_some(" *")}
            </label>
            {control}
            {move || {
                state.with(|s| {
                    s.error_for(&error_name).map(|msg| view! { <p class="form-field__error">{msg.to_owned()}</p> })
                })
            }}
        </div>
    }
}
