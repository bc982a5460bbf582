//! Activity list, the signed-in landing page.

#[cfg(test)]
#[path = "activities_test.rs"]
mod activities_test;

use leptos::prelude::*;

use crate::components::alert::ErrorAlert;
use crate::components::protected_route::Can;
use crate::net::api::ApiClient;
use crate::net::resources;
use crate::net::types::Activity;
use crate::pages::activity::spots_label;

/// Permission that gates creating and deleting activities.
pub(crate) const MANAGE_ACTIVITIES: &str = "manage_activities";
pub(crate) const NEW_ACTIVITY_PATH: &str = "/activities/new";

#[component]
pub fn ActivitiesPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let error = RwSignal::new(None::<String>);

    let list_api = api.clone();
    let activities = LocalResource::new(move || {
        let api = list_api.clone();
        async move { resources::list::<Activity>(&api).await }
    });

    let delete = move |id: String| {
        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            let activities = activities.clone();
            leptos::task::spawn_local(async move {
                match resources::remove::<Activity>(&api, &id).await {
                    Ok(()) => activities.refetch(),
                    Err(e) => {
                        tracing::warn!(error = %e, activity_id = %id, "delete activity failed");
                        error.set(Some(e.message));
                    }
                }
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, &activities, &id);
        }
    };

    view! {
        <div class="activities-page">
            <header class="activities-page__header">
                <h1>"Activities"</h1>
                <Can permission=MANAGE_ACTIVITIES>
                    <a class="btn btn--primary" href=NEW_ACTIVITY_PATH>
                        "New activity"
                    </a>
                </Can>
                <Can permission="manage_categories">
                    <a class="btn" href="/admin/categories">
                        "Manage categories"
                    </a>
                </Can>
            </header>
            <ErrorAlert message=error on_dismiss=Callback::new(move |()| error.set(None))/>
            <Suspense fallback=move || view! { <p>"Loading activities..."</p> }>
                {move || {
                    activities
                        .get()
                        .map(|result| match result {
                            Ok(list) if list.is_empty() => {
                                view! { <p class="activities-page__empty">"No activities scheduled."</p> }.into_any()
                            }
                            Ok(list) => {
                                view! {
                                    <ul class="activity-list">
                                        {list
                                            .into_iter()
                                            .map(|item| activity_row(item, delete.clone()))
                                            .collect::<Vec<_>>()}
                                    </ul>
                                }
                                    .into_any()
                            }
                            Err(e) => view! { <p class="activities-page__error">{e.message}</p> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}

fn activity_row<F>(item: Activity, on_delete: F) -> impl IntoView
where
    F: Fn(String) + Clone + Send + Sync + 'static,
{
    let href = format!("/activities/{}", item.id);
    let id = item.id.clone();
    let spots = spots_label(&item);

    view! {
        <li class="activity-card">
            <a class="activity-card__title" href=href>
                {item.title}
            </a>
            <span class="activity-card__when">{item.start_date}</span>
            <span class="activity-card__spots">{spots}</span>
            <Can permission=MANAGE_ACTIVITIES>
                {
                    let on_delete = on_delete.clone();
                    let id = id.clone();
                    view! {
                        <button class="btn btn--danger" on:click=move |_| on_delete(id.clone())>
                            "Delete"
                        </button>
                    }
                }
            </Can>
        </li>
    }
}
