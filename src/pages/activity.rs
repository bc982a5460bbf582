//! Activity detail page with enroll / cancel.

#[cfg(test)]
#[path = "activity_test.rs"]
mod activity_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::alert::ErrorAlert;
use crate::net::api::ApiClient;
use crate::net::resources;
use crate::net::types::{Activity, Enrollment, EnrollmentStatus};

/// What the enrollment button offers for one activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnrollAction {
    Enroll,
    Cancel,
    /// Not enrolled and no open spots.
    Full,
}

impl EnrollAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Enroll => "Enroll",
            Self::Cancel => "Cancel enrollment",
            Self::Full => "Activity full",
        }
    }
}

/// Whether `enrollments` holds an active enrollment in `activity_id`.
pub(crate) fn is_enrolled(enrollments: &[Enrollment], activity_id: &str) -> bool {
    enrollments.iter().any(|e| e.activity_id == activity_id && e.status == EnrollmentStatus::Active)
}

pub(crate) fn enroll_action(activity: &Activity, enrolled: bool) -> EnrollAction {
    if enrolled {
        EnrollAction::Cancel
    } else if activity.has_open_spots() {
        EnrollAction::Enroll
    } else {
        EnrollAction::Full
    }
}

/// "3 / 20 enrolled", or "3 enrolled" when capacity is unlimited.
pub(crate) fn spots_label(activity: &Activity) -> String {
    match activity.capacity {
        Some(cap) => format!("{} / {cap} enrolled", activity.enrolled_count),
        None => format!("{} enrolled", activity.enrolled_count),
    }
}

#[component]
pub fn ActivityPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let params = use_params_map();
    let activity_id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let activity_api = api.clone();
    let activity = LocalResource::new(move || {
        let api = activity_api.clone();
        let id = activity_id.get();
        async move { resources::get::<Activity>(&api, &id).await }
    });
    let enrollments_api = api.clone();
    let enrollments = LocalResource::new(move || {
        let api = enrollments_api.clone();
        async move { resources::my_enrollments(&api).await }
    });

    let enrolled = move || {
        enrollments
            .get()
            .and_then(Result::ok)
            .is_some_and(|list| activity_id.with(|id| is_enrolled(&list, id)))
    };

    let run_action = move |action: EnrollAction| {
        if action == EnrollAction::Full || busy.get_untracked() {
            return;
        }
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            let id = activity_id.get_untracked();
            let activity = activity.clone();
            let enrollments = enrollments.clone();
            leptos::task::spawn_local(async move {
                let result = match action {
                    EnrollAction::Cancel => resources::cancel_enrollment(&api, &id).await,
                    _ => resources::enroll(&api, &id).await.map(|_| ()),
                };
                busy.set(false);
                match result {
                    Ok(()) => {
                        activity.refetch();
                        enrollments.refetch();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, activity_id = %id, "enrollment change failed");
                        error.set(Some(e.message));
                    }
                }
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, &activity, &enrollments);
            busy.set(false);
        }
    };

    view! {
        <div class="activity-page">
            <a class="activity-page__back" href="/">
                "← All activities"
            </a>
            <ErrorAlert message=error on_dismiss=Callback::new(move |()| error.set(None))/>
            <Suspense fallback=move || view! { <p>"Loading activity..."</p> }>
                {move || {
                    activity
                        .get()
                        .map(|result| match result {
                            Ok(item) => {
                                let action = enroll_action(&item, enrolled());
                                let run_action = run_action.clone();
                                view! {
                                    <article class="activity-detail">
                                        <h1>{item.title.clone()}</h1>
                                        <p class="activity-detail__when">
                                            {item.start_date.clone()}
                                            {item.end_date.clone().map(|end| format!(" – {end}"))}
                                        </p>
                                        {item.image_url.clone().map(|src| view! { <img class="activity-detail__image" src=src alt=""/> })}
                                        <p class="activity-detail__description">{item.description.clone()}</p>
                                        <p class="activity-detail__spots">{spots_label(&item)}</p>
                                        <button
                                            class="btn btn--primary"
                                            disabled=move || busy.get() || action == EnrollAction::Full
                                            on:click=move |_| run_action(action)
                                        >
                                            {action.label()}
                                        </button>
                                    </article>
                                }
                                    .into_any()
                            }
                            Err(e) => view! { <p class="activity-page__error">{e.message}</p> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}
