//! Category administration: list, create, delete.
//!
//! Routed behind `ProtectedRoute`; the `/admin/categories` rule requires
//! `manage_categories`.

#[cfg(test)]
#[path = "admin_categories_test.rs"]
mod admin_categories_test;

use leptos::prelude::*;

use crate::components::alert::ErrorAlert;
use crate::components::form::{Form, submit_handler};
use crate::net::api::ApiClient;
use crate::net::resources;
use crate::net::types::{Category, NewCategory};
use crate::util::form::{FieldKind, FieldSpec, FormValues};

pub(crate) fn category_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("name", "Name").required().min_length(2),
        FieldSpec::new("description", "Description").kind(FieldKind::TextArea),
    ]
}

/// Request body from form values; a blank description is omitted.
pub(crate) fn category_draft(values: &FormValues) -> NewCategory {
    let read = |key: &str| values.get(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
    NewCategory { name: read("name").unwrap_or_default(), description: read("description") }
}

#[component]
pub fn AdminCategoriesPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let error = RwSignal::new(None::<String>);

    let list_api = api.clone();
    let categories = LocalResource::new(move || {
        let api = list_api.clone();
        async move { resources::list::<Category>(&api).await }
    });

    let create_api = api.clone();
    let on_create = submit_handler(move |values| {
        let api = create_api.clone();
        let categories = categories.clone();
        async move {
            let created: Category =
                resources::create(&api, &category_draft(&values)).await.map_err(|e| e.message)?;
            tracing::info!(category_id = %created.id, "category created");
            categories.refetch();
            Ok(())
        }
    });

    let delete = move |id: String| {
        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            let categories = categories.clone();
            leptos::task::spawn_local(async move {
                match resources::remove::<Category>(&api, &id).await {
                    Ok(()) => categories.refetch(),
                    Err(e) => {
                        tracing::warn!(error = %e, category_id = %id, "delete category failed");
                        error.set(Some(e.message));
                    }
                }
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, &categories, &id);
        }
    };

    view! {
        <div class="admin-page">
            <h1>"Categories"</h1>
            <ErrorAlert message=error on_dismiss=Callback::new(move |()| error.set(None))/>
            <section class="admin-page__create">
                <h2>"New category"</h2>
                <Form fields=category_fields() on_submit=on_create submit_label="Create" reset_on_success=true/>
            </section>
            <Suspense fallback=move || view! { <p>"Loading categories..."</p> }>
                {move || {
                    categories
                        .get()
                        .map(|result| match result {
                            Ok(list) => {
                                view! {
                                    <table class="admin-table">
                                        <thead>
                                            <tr>
                                                <th>"Name"</th>
                                                <th>"Description"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {list
                                                .into_iter()
                                                .map(|category| {
                                                    let delete = delete.clone();
                                                    let id = category.id.clone();
                                                    view! {
                                                        <tr>
                                                            <td>{category.name}</td>
                                                            <td>{category.description.unwrap_or_default()}</td>
                                                            <td>
                                                                <button
                                                                    class="btn btn--danger"
                                                                    on:click=move |_| delete(id.clone())
                                                                >
                                                                    "Delete"
                                                                </button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect::<Vec<_>>()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => view! { <p class="admin-page__error">{e.message}</p> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}
