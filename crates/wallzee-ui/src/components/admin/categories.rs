use gloo::console;
use gloo::dialogs::confirm;
use wallzee_api_models::CategoryInput;
use wallzee_core::CategorySummary;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::{error_banner, spinner};
use crate::app::use_api;
use crate::components::toast::notify_form;
use crate::models::{CategoryForm, ToastKind, category_delete_prompt};

fn text_field(
    form: &UseStateHandle<CategoryForm>,
    apply: fn(&mut CategoryForm, String),
) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
            let mut next = (*form).clone();
            apply(&mut next, input.value());
            form.set(next);
        }
    })
}

#[function_component(CategoriesAdmin)]
pub(crate) fn categories_admin() -> Html {
    let client = use_api();
    let summaries = use_state(|| None::<Vec<CategorySummary>>);
    let error = use_state(|| None::<String>);
    let form = use_state(CategoryForm::default);
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);
    // Bumped after every write to refetch counts.
    let revision = use_state(|| 0_u32);

    {
        let client = client.clone();
        let summaries = summaries.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match client.category_summaries().await {
                        Ok(loaded) => {
                            error.set(None);
                            summaries.set(Some(loaded));
                        }
                        Err(err) => {
                            console::error!(format!("category load failed: {err}"));
                            error.set(Some("Failed to load categories".into()));
                            summaries.set(Some(Vec::new()));
                        }
                    }
                });
                || ()
            },
            *revision,
        );
    }

    let on_name = text_field(&form, |form, value| form.name = value);
    let on_description = text_field(&form, |form, value| form.description = value);
    let on_icon = text_field(&form, |form, value| form.icon = value);
    let on_cancel = {
        let form = form.clone();
        let form_error = form_error.clone();
        Callback::from(move |_: MouseEvent| {
            form.set(CategoryForm::default());
            form_error.set(None);
        })
    };
    let on_submit = {
        let client = client.clone();
        let form = form.clone();
        let form_error = form_error.clone();
        let saving = saving.clone();
        let revision = revision.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let current = (*form).clone();
            if let Err(reason) = current.validate() {
                form_error.set(Some(reason.to_string()));
                return;
            }
            form_error.set(None);
            saving.set(true);
            let client = client.clone();
            let form = form.clone();
            let saving = saving.clone();
            let revision = revision.clone();
            spawn_local(async move {
                let input = CategoryInput::new(&current.name, current.description(), current.icon());
                let action = if current.editing.is_some() { "update" } else { "create" };
                match client.save_category(current.editing.as_deref(), input).await {
                    Ok(saved) => {
                        form.set(CategoryForm::default());
                        revision.set(*revision + 1);
                        notify_form(ToastKind::Success, format!("Category \"{}\" saved", saved.name));
                    }
                    Err(err) => {
                        notify_form(ToastKind::Error, format!("Failed to {action} category: {err}"));
                    }
                }
                saving.set(false);
            });
        })
    };
    let on_edit = {
        let form = form.clone();
        let form_error = form_error.clone();
        Callback::from(move |summary: CategorySummary| {
            form.set(CategoryForm::edit(&summary.category));
            form_error.set(None);
        })
    };
    let on_delete = {
        let client = client.clone();
        let revision = revision.clone();
        Callback::from(move |summary: CategorySummary| {
            if !confirm(&category_delete_prompt(&summary.category.name)) {
                return;
            }
            let client = client.clone();
            let revision = revision.clone();
            spawn_local(async move {
                match client
                    .delete_category(&summary.category.id, summary.wallpaper_count)
                    .await
                {
                    Ok(()) => {
                        revision.set(*revision + 1);
                        notify_form(ToastKind::Success, "Category deleted successfully");
                    }
                    Err(err) => notify_form(ToastKind::Error, err.to_string()),
                }
            });
        })
    };

    let editing = form.editing.is_some();
    let table = match summaries.as_ref() {
        None => spinner(),
        Some(rows) if rows.is_empty() => {
            html! { <p class="text-center py-8 opacity-70">{"No categories yet."}</p> }
        }
        Some(rows) => html! {
            <div class="overflow-x-auto">
                <table class="table w-full">
                    <thead>
                        <tr>
                            <th>{"Icon"}</th>
                            <th>{"Name"}</th>
                            <th>{"Description"}</th>
                            <th>{"Wallpapers"}</th>
                            <th>{"Actions"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for rows.iter().map(|summary| {
                            let edit = {
                                let summary = summary.clone();
                                on_edit.reform(move |_: MouseEvent| summary.clone())
                            };
                            let delete = {
                                let summary = summary.clone();
                                on_delete.reform(move |_: MouseEvent| summary.clone())
                            };
                            let category = &summary.category;
                            html! {
                                <tr key={category.id.clone()}>
                                    <td class="text-2xl">{category.icon.clone().unwrap_or_default()}</td>
                                    <td>{category.name.clone()}</td>
                                    <td class="opacity-70">{category.description.clone().unwrap_or_default()}</td>
                                    <td>{summary.wallpaper_count}</td>
                                    <td class="flex gap-2">
                                        <button class="btn btn-ghost btn-xs" onclick={edit}>{"Edit"}</button>
                                        <button class="btn btn-error btn-xs" onclick={delete}
                                            disabled={summary.wallpaper_count > 0}
                                            title={(summary.wallpaper_count > 0).then_some("Cannot delete category with wallpapers")}>
                                            {"Delete"}
                                        </button>
                                    </td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            </div>
        },
    };

    html! {
        <>
            <h1 class="text-3xl font-bold mb-6">{"Manage Categories"}</h1>
            {error_banner(error.as_ref())}
            <form class="card bg-base-100 shadow-md mb-8" onsubmit={on_submit}>
                <div class="card-body grid md:grid-cols-3 gap-4">
                    <h2 class="card-title md:col-span-3">
                        {if editing { "Edit Category" } else { "Add Category" }}
                    </h2>
                    {error_banner(form_error.as_ref())}
                    <label class="form-control">
                        <span class="label-text">{"Name"}</span>
                        <input class="input input-bordered" value={form.name.clone()} oninput={on_name} />
                    </label>
                    <label class="form-control">
                        <span class="label-text">{"Description"}</span>
                        <input class="input input-bordered" value={form.description.clone()} oninput={on_description} />
                    </label>
                    <label class="form-control">
                        <span class="label-text">{"Icon"}</span>
                        <input class="input input-bordered" value={form.icon.clone()} oninput={on_icon} />
                    </label>
                    <div class="md:col-span-3 flex gap-2">
                        <button class="btn btn-primary" type="submit" disabled={*saving}>
                            {if editing { "Update Category" } else { "Create Category" }}
                        </button>
                        if editing {
                            <button class="btn btn-ghost" type="button" onclick={on_cancel}>{"Cancel"}</button>
                        }
                    </div>
                </div>
            </form>
            {table}
        </>
    }
}
