use std::str::FromStr;

use gloo::console;
use gloo::dialogs::confirm;
use wallzee_core::{DeviceType, WallpaperRecord};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::{error_banner, spinner};
use crate::app::use_api;
use crate::components::toast::notify_form;
use crate::models::{ToastKind, UploadForm, WALLPAPER_DELETE_PROMPT};
use crate::services::api::ChunkProgress;
use crate::state::{GalleryAction, GalleryModel};

fn selected_file(input: &NodeRef) -> Option<web_sys::File> {
    input
        .cast::<HtmlInputElement>()
        .and_then(|input| input.files())
        .and_then(|files| files.get(0))
}

#[function_component(WallpapersAdmin)]
pub(crate) fn wallpapers_admin() -> Html {
    let client = use_api();
    let gallery = {
        let page_size = client.page_size();
        use_reducer(move || GalleryModel::new(None, page_size))
    };
    let form = use_state(UploadForm::default);
    let file_input = use_node_ref();
    let progress = use_state(|| None::<u32>);
    let form_error = use_state(|| None::<String>);

    {
        let client = client.clone();
        let dispatcher = gallery.dispatcher();
        use_effect_with_deps(
            move |_| {
                dispatcher.dispatch(GalleryAction::Loading);
                spawn_local(async move {
                    let (records, categories) =
                        futures_util::join!(client.admin_wallpapers(), client.list_categories());
                    match (records, categories) {
                        (Ok(records), Ok(categories)) => dispatcher.dispatch(GalleryAction::Loaded {
                            records,
                            categories: Some(categories),
                        }),
                        (Err(err), _) | (_, Err(err)) => {
                            console::error!(format!("admin wallpaper load failed: {err}"));
                            dispatcher.dispatch(GalleryAction::Failed("Failed to load wallpapers".into()));
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    let on_title = {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                next.title = input.value();
                form.set(next);
            }
        })
    };
    let on_device = {
        let form = form.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                if let Ok(device) = DeviceType::from_str(&select.value()) {
                    let mut next = (*form).clone();
                    next.device = device;
                    form.set(next);
                }
            }
        })
    };
    let on_category = {
        let form = form.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                let mut next = (*form).clone();
                next.category_id = select.value();
                form.set(next);
            }
        })
    };
    let on_submit = {
        let client = client.clone();
        let dispatcher = gallery.dispatcher();
        let form = form.clone();
        let file_input = file_input.clone();
        let progress = progress.clone();
        let form_error = form_error.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let file = selected_file(&file_input);
            let current = (*form).clone();
            if let Err(reason) = current.validate(file.is_some()) {
                form_error.set(Some(reason.to_string()));
                return;
            }
            let Some(file) = file else {
                return;
            };
            form_error.set(None);
            progress.set(Some(0));

            let client = client.clone();
            let dispatcher = dispatcher.clone();
            let form = form.clone();
            let file_input = file_input.clone();
            let progress = progress.clone();
            spawn_local(async move {
                let report = {
                    let progress = progress.clone();
                    move |chunk: ChunkProgress| progress.set(Some(chunk.percent()))
                };
                let result = client
                    .upload_wallpaper(
                        &current.title,
                        current.device,
                        current.category(),
                        &file,
                        &report,
                    )
                    .await;
                progress.set(None);
                match result {
                    Ok(record) => {
                        dispatcher.dispatch(GalleryAction::Prepended(record));
                        let mut next = current;
                        next.reset();
                        form.set(next);
                        if let Some(input) = file_input.cast::<HtmlInputElement>() {
                            input.set_value("");
                        }
                        notify_form(ToastKind::Success, "Wallpaper uploaded successfully");
                    }
                    Err(err) => {
                        notify_form(ToastKind::Error, format!("Failed to upload wallpaper: {err}"));
                    }
                }
            });
        })
    };

    let on_feature = {
        let client = client.clone();
        let dispatcher = gallery.dispatcher();
        Callback::from(move |record: WallpaperRecord| {
            let client = client.clone();
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                match client.set_featured(&record.id, !record.featured).await {
                    Ok(updated) => dispatcher.dispatch(GalleryAction::Replaced(updated)),
                    Err(err) => notify_form(
                        ToastKind::Error,
                        format!("Failed to update wallpaper: {err}"),
                    ),
                }
            });
        })
    };
    let on_delete = {
        let client = client.clone();
        let dispatcher = gallery.dispatcher();
        Callback::from(move |record: WallpaperRecord| {
            if !confirm(WALLPAPER_DELETE_PROMPT) {
                return;
            }
            let client = client.clone();
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                match client.delete_wallpaper(&record).await {
                    Ok(orphan) => {
                        dispatcher.dispatch(GalleryAction::Removed(record.id.clone()));
                        if let Some(file_id) = orphan {
                            console::warn!(format!("image file {file_id} could not be removed"));
                        }
                        notify_form(ToastKind::Success, "Wallpaper deleted successfully");
                    }
                    Err(err) => notify_form(
                        ToastKind::Error,
                        format!("Failed to delete wallpaper: {err}"),
                    ),
                }
            });
        })
    };

    let listing = &gallery.listing;
    let uploading = progress.is_some();
    let table = if gallery.loading {
        spinner()
    } else if listing.records().is_empty() {
        html! { <p class="text-center py-8 opacity-70">{"No wallpapers found. Upload your first one above."}</p> }
    } else {
        html! {
            <div class="overflow-x-auto">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>{"Preview"}</th>
                            <th>{"Title"}</th>
                            <th>{"Device"}</th>
                            <th>{"Downloads"}</th>
                            <th>{"Featured"}</th>
                            <th>{"Actions"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for listing.records().iter().map(|record| {
                            let feature = {
                                let record = record.clone();
                                on_feature.reform(move |_: MouseEvent| record.clone())
                            };
                            let delete = {
                                let record = record.clone();
                                on_delete.reform(move |_: MouseEvent| record.clone())
                            };
                            html! {
                                <tr key={record.id.clone()}>
                                    <td>
                                        <img class="w-16 h-16 object-cover rounded" loading="lazy"
                                            src={client.thumbnail(record)} alt={record.title.clone()} />
                                    </td>
                                    <td>{record.title.clone()}</td>
                                    <td><span class="badge badge-outline">{record.device.as_str()}</span></td>
                                    <td>{record.downloads}</td>
                                    <td>
                                        <input type="checkbox" class="toggle toggle-primary"
                                            checked={record.featured} onclick={feature} />
                                    </td>
                                    <td>
                                        <button class="btn btn-error btn-xs" onclick={delete}>{"Delete"}</button>
                                    </td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            </div>
        }
    };

    html! {
        <>
            <h1 class="text-3xl font-bold mb-6">{"Manage Wallpapers"}</h1>
            {error_banner(gallery.error.as_ref())}
            <form class="card bg-base-100 shadow-md mb-8" onsubmit={on_submit}>
                <div class="card-body grid md:grid-cols-2 gap-4">
                    <h2 class="card-title md:col-span-2">{"Upload New Wallpaper"}</h2>
                    {error_banner(form_error.as_ref())}
                    <label class="form-control">
                        <span class="label-text">{"Title"}</span>
                        <input class="input input-bordered" value={form.title.clone()} oninput={on_title} />
                    </label>
                    <label class="form-control">
                        <span class="label-text">{"Device"}</span>
                        <select class="select select-bordered" onchange={on_device}>
                            {for DeviceType::all().into_iter().map(|device| html! {
                                <option value={device.as_str()} selected={device == form.device}>{device.as_str()}</option>
                            })}
                        </select>
                    </label>
                    <label class="form-control">
                        <span class="label-text">{"Category"}</span>
                        <select class="select select-bordered" onchange={on_category}>
                            <option value="" selected={form.category_id.is_empty()}>{"None"}</option>
                            {for listing.categories().iter().map(|category| html! {
                                <option value={category.id.clone()} selected={category.id == form.category_id}>
                                    {category.name.clone()}
                                </option>
                            })}
                        </select>
                    </label>
                    <label class="form-control">
                        <span class="label-text">{"Image"}</span>
                        <input ref={file_input} type="file" accept="image/*" class="file-input file-input-bordered" />
                    </label>
                    if let Some(percent) = *progress {
                        <progress class="progress progress-primary md:col-span-2" value={percent.to_string()} max="100"></progress>
                    }
                    <div class="md:col-span-2">
                        <button class="btn btn-primary" type="submit" disabled={uploading}>
                            {if uploading { "Uploading..." } else { "Upload Wallpaper" }}
                        </button>
                    </div>
                </div>
            </form>
            {table}
        </>
    }
}
