//! Public gallery views: featured strip, device galleries, preview modal.

use std::rc::Rc;

use gloo::console;
use wallzee_core::download::{failure_message, plan_download, success_message};
use wallzee_core::seo::{GalleryImage, image_gallery_schema};
use wallzee_core::{DeviceType, PageToken, WallpaperRecord};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;

use crate::app::{head, use_api};
use crate::components::toast::notify_download;
use crate::models::ToastKind;
use crate::routes::Route;
use crate::services::api::ApiClient;
use crate::services::download::save_as;
use crate::state::{GalleryAction, GalleryModel, settle_increment};

/// Save a wallpaper, then bump its counter remotely and locally.
fn start_download(
    client: Rc<ApiClient>,
    gallery: UseReducerDispatcher<GalleryModel>,
    record: &WallpaperRecord,
) {
    let plan = match plan_download(record, |file_id| client.download_url(file_id)) {
        Ok(plan) => plan,
        Err(err) => {
            notify_download(ToastKind::Error, failure_message(&err.to_string()));
            return;
        }
    };
    gallery.dispatch(GalleryAction::DownloadStarted(plan.id.clone()));
    if let Err(err) = save_as(&plan.url, &plan.filename) {
        notify_download(ToastKind::Error, failure_message(&err.to_string()));
        gallery.dispatch(GalleryAction::DownloadFinished {
            id: plan.id,
            success: false,
        });
        return;
    }
    notify_download(ToastKind::Success, success_message(&plan.title));

    spawn_local(async move {
        let outcome = client.increment_downloads(&plan.id).await.map(|_| ()).map_err(|err| {
            console::warn!(format!("download counter not updated for {}: {err}", plan.id));
            err.to_string()
        });
        let (action, message) = settle_increment(plan.id, outcome);
        if let Some(message) = message {
            notify_download(ToastKind::Error, message);
        }
        gallery.dispatch(action);
    });
}

#[derive(Properties, PartialEq)]
struct CardProps {
    record: WallpaperRecord,
    image: String,
    downloading: bool,
    on_open: Callback<WallpaperRecord>,
    on_download: Callback<WallpaperRecord>,
}

#[function_component(WallpaperCard)]
fn wallpaper_card(props: &CardProps) -> Html {
    let record = props.record.clone();
    let aspect = match record.device {
        DeviceType::Phone => "aspect-[9/16]",
        DeviceType::Desktop => "aspect-video",
    };
    let open = {
        let record = record.clone();
        props.on_open.reform(move |_: MouseEvent| record.clone())
    };
    let download = {
        let record = record.clone();
        props.on_download.reform(move |event: MouseEvent| {
            event.stop_propagation();
            record.clone()
        })
    };

    html! {
        <div class="card bg-base-100 shadow-md hover:shadow-xl transition cursor-pointer" onclick={open}>
            <figure class={classes!("overflow-hidden", aspect)}>
                <img src={props.image.clone()} alt={record.title.clone()} loading="lazy" class="object-cover w-full h-full" />
            </figure>
            <div class="card-body p-3">
                <h3 class="card-title text-sm truncate">{record.title.clone()}</h3>
                <div class="flex justify-between items-center text-xs opacity-70">
                    <span>{format!("{} downloads", record.downloads)}</span>
                    <button class="btn btn-primary btn-xs" disabled={props.downloading} onclick={download}>
                        if props.downloading {
                            <span class="loading loading-spinner loading-xs"></span>
                        } else {
                            {"Download"}
                        }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PreviewProps {
    record: WallpaperRecord,
    image: String,
    downloading: bool,
    on_close: Callback<()>,
    on_download: Callback<WallpaperRecord>,
}

#[function_component(PreviewModal)]
fn preview_modal(props: &PreviewProps) -> Html {
    let close = props.on_close.reform(|_: MouseEvent| ());
    let download = {
        let record = props.record.clone();
        props.on_download.reform(move |_: MouseEvent| record.clone())
    };

    html! {
        <div class="modal modal-open" role="dialog">
            <div class="modal-box max-w-4xl">
                <h3 class="font-bold text-lg">{props.record.title.clone()}</h3>
                <img src={props.image.clone()} alt={props.record.title.clone()} class="w-full max-h-[70vh] object-contain my-4" />
                <div class="modal-action">
                    <button class="btn" onclick={close.clone()}>{"Close"}</button>
                    <button class="btn btn-primary" disabled={props.downloading} onclick={download}>{"Download"}</button>
                </div>
            </div>
            <div class="modal-backdrop" onclick={close}></div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PaginationProps {
    tokens: Vec<PageToken>,
    current: usize,
    total: usize,
    on_page: Callback<usize>,
    on_prev: Callback<()>,
    on_next: Callback<()>,
}

#[function_component(Pagination)]
fn pagination(props: &PaginationProps) -> Html {
    let prev = props.on_prev.reform(|_: MouseEvent| ());
    let next = props.on_next.reform(|_: MouseEvent| ());

    html! {
        <div class="join flex justify-center mt-8">
            <button class="join-item btn" disabled={props.current <= 1} onclick={prev}>{"«"}</button>
            {for props.tokens.iter().map(|token| match token {
                PageToken::Page(page) => {
                    let page = *page;
                    let onclick = props.on_page.reform(move |_: MouseEvent| page);
                    let class = classes!("join-item", "btn", (page == props.current).then_some("btn-active"));
                    html! { <button {class} {onclick}>{page}</button> }
                }
                PageToken::Ellipsis => html! { <button class="join-item btn btn-disabled">{"..."}</button> },
            })}
            <button class="join-item btn" disabled={props.current >= props.total} onclick={next}>{"»"}</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct GalleryPageProps {
    pub device: DeviceType,
}

/// Device gallery with category filter, search, and pagination.
#[function_component(GalleryPage)]
pub(crate) fn gallery_page(props: &GalleryPageProps) -> Html {
    let client = use_api();
    let device = props.device;
    let gallery = {
        let page_size = client.page_size();
        use_reducer(move || GalleryModel::new(Some(device), page_size))
    };
    let preview = use_state(|| None::<WallpaperRecord>);

    {
        let client = client.clone();
        let dispatcher = gallery.dispatcher();
        use_effect_with_deps(
            move |device: &DeviceType| {
                let device = *device;
                dispatcher.dispatch(GalleryAction::Loading);
                spawn_local(async move {
                    let (records, categories) = futures_util::join!(
                        client.list_wallpapers(Some(device)),
                        client.list_categories()
                    );
                    match (records, categories) {
                        (Ok(records), Ok(categories)) => {
                            let images: Vec<GalleryImage> = records
                                .iter()
                                .take(10)
                                .map(|record| GalleryImage {
                                    url: client.image_url(record),
                                    name: record.title.clone(),
                                    description: None,
                                })
                                .collect();
                            let title = format!("{} Wallpapers", capitalize(device.as_str()));
                            head::apply_schema(Some(&image_gallery_schema(
                                &title,
                                &format!("Free HD {device} wallpapers from Wallzee"),
                                &images,
                            )));
                            dispatcher.dispatch(GalleryAction::Loaded {
                                records,
                                categories: Some(categories),
                            });
                        }
                        (Err(err), _) | (_, Err(err)) => {
                            console::error!(format!("gallery load failed: {err}"));
                            dispatcher.dispatch(GalleryAction::Failed(
                                "Failed to load wallpapers. Please try again later.".into(),
                            ));
                        }
                    }
                });
                || ()
            },
            device,
        );
    }

    let listing = &gallery.listing;
    let on_category = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                dispatcher.dispatch(GalleryAction::SelectCategory(select.value()));
            }
        })
    };
    let on_search = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                dispatcher.dispatch(GalleryAction::Search(input.value()));
            }
        })
    };
    let on_download = {
        let client = client.clone();
        let dispatcher = gallery.dispatcher();
        let gallery = gallery.clone();
        Callback::from(move |record: WallpaperRecord| {
            if !gallery.listing.is_downloading(&record.id) {
                start_download(client.clone(), dispatcher.clone(), &record);
            }
        })
    };
    let on_open = {
        let preview = preview.clone();
        Callback::from(move |record: WallpaperRecord| preview.set(Some(record)))
    };
    let on_close = {
        let preview = preview.clone();
        Callback::from(move |()| preview.set(None))
    };

    let on_page = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |page: usize| dispatcher.dispatch(GalleryAction::GoTo(page)))
    };
    let on_prev = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |()| dispatcher.dispatch(GalleryAction::Prev))
    };
    let on_next = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |()| dispatcher.dispatch(GalleryAction::Next))
    };

    let page = listing.visible_page();
    let selected = listing.filter().category.label().to_string();
    let grid = match device {
        DeviceType::Phone => "grid grid-cols-2 sm:grid-cols-3 md:grid-cols-4 lg:grid-cols-5 gap-4",
        DeviceType::Desktop => "grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6",
    };

    let body = if gallery.loading {
        html! {
            <div class="flex justify-center py-20"><span class="loading loading-spinner loading-lg"></span></div>
        }
    } else if let Some(error) = gallery.error.clone() {
        html! { <div class="alert alert-error">{error}</div> }
    } else if page.items.is_empty() {
        html! { <div class="text-center py-20 opacity-70">{"No wallpapers found"}</div> }
    } else {
        html! {
            <>
                <div class={grid}>
                    {for page.items.iter().map(|record| html! {
                        <WallpaperCard
                            key={record.id.clone()}
                            record={(*record).clone()}
                            image={client.image_url(record)}
                            downloading={listing.is_downloading(&record.id)}
                            on_open={on_open.clone()}
                            on_download={on_download.clone()}
                        />
                    })}
                </div>
                if listing.show_pagination() {
                    <Pagination
                        tokens={listing.page_tokens()}
                        current={page.current}
                        total={page.total_pages}
                        {on_page}
                        {on_prev}
                        {on_next}
                    />
                }
            </>
        }
    };
    let modal = (*preview).clone().map_or_else(Html::default, |record| {
        html! {
            <PreviewModal
                image={client.image_url(&record)}
                downloading={listing.is_downloading(&record.id)}
                {record}
                {on_close}
                on_download={on_download.clone()}
            />
        }
    });

    html! {
        <section class="max-w-7xl mx-auto px-4 py-10">
            <h1 class="text-3xl font-bold mb-6">{format!("{} Wallpapers", capitalize(device.as_str()))}</h1>
            <div class="flex flex-col md:flex-row gap-4 mb-6">
                <select class="select select-bordered" onchange={on_category}>
                    {for listing.category_options().into_iter().map(|option| html! {
                        <option value={option.clone()} selected={option == selected}>{option.clone()}</option>
                    })}
                </select>
                <input
                    class="input input-bordered flex-1"
                    type="search"
                    placeholder="Search wallpapers..."
                    value={listing.filter().search.clone()}
                    oninput={on_search}
                />
            </div>
            {body}
            {modal}
        </section>
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Featured strip with a phone/desktop toggle.
#[function_component(Featured)]
fn featured() -> Html {
    let client = use_api();
    let device = use_state(|| DeviceType::Phone);
    let gallery = {
        let page_size = client.page_size();
        use_reducer(move || GalleryModel::new(None, page_size))
    };

    {
        let client = client.clone();
        let dispatcher = gallery.dispatcher();
        use_effect_with_deps(
            move |device: &DeviceType| {
                let device = *device;
                dispatcher.dispatch(GalleryAction::Loading);
                spawn_local(async move {
                    match client.featured(device).await {
                        Ok(records) => dispatcher.dispatch(GalleryAction::Loaded {
                            records,
                            categories: None,
                        }),
                        Err(err) => {
                            console::error!(format!("featured load failed: {err}"));
                            dispatcher.dispatch(GalleryAction::Failed(
                                "Failed to load featured wallpapers".into(),
                            ));
                        }
                    }
                });
                || ()
            },
            *device,
        );
    }

    let on_download = {
        let client = client.clone();
        let dispatcher = gallery.dispatcher();
        let gallery = gallery.clone();
        Callback::from(move |record: WallpaperRecord| {
            if !gallery.listing.is_downloading(&record.id) {
                start_download(client.clone(), dispatcher.clone(), &record);
            }
        })
    };
    let toggle = |target: DeviceType| {
        let device = device.clone();
        Callback::from(move |_: MouseEvent| device.set(target))
    };
    let noop = Callback::from(|_: WallpaperRecord| ());

    let records = gallery.listing.records();
    let body = if gallery.loading {
        html! {
            <div class="flex justify-center py-10"><span class="loading loading-spinner loading-lg"></span></div>
        }
    } else if let Some(error) = gallery.error.clone() {
        html! { <div class="alert alert-error">{error}</div> }
    } else if records.is_empty() {
        html! { <div class="text-center py-10 opacity-70">{"No featured wallpapers yet"}</div> }
    } else {
        html! {
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {for records.iter().map(|record| html! {
                    <WallpaperCard
                        key={record.id.clone()}
                        record={record.clone()}
                        image={client.image_url(record)}
                        downloading={gallery.listing.is_downloading(&record.id)}
                        on_open={noop.clone()}
                        on_download={on_download.clone()}
                    />
                })}
            </div>
        }
    };

    html! {
        <section class="max-w-7xl mx-auto px-4 py-12">
            <div class="flex justify-between items-center mb-6">
                <h2 class="text-2xl font-bold">{"Featured Wallpapers"}</h2>
                <div class="join">
                    {for DeviceType::all().into_iter().map(|option| html! {
                        <button
                            class={classes!("join-item", "btn", "btn-sm", (option == *device).then_some("btn-active"))}
                            onclick={toggle(option)}
                        >
                            {capitalize(option.as_str())}
                        </button>
                    })}
                </div>
            </div>
            {body}
            <div class="text-center mt-8">
                <Link<Route> to={Route::for_device(*device)} classes="btn btn-outline">
                    {format!("Browse all {} wallpapers", device.as_str())}
                </Link<Route>>
            </div>
        </section>
    }
}

#[function_component(HomePage)]
pub(crate) fn home_page() -> Html {
    use_effect_with_deps(
        |_| {
            head::apply_schema(None);
            || ()
        },
        (),
    );

    html! {
        <>
            <div class="hero min-h-[60vh] bg-base-100">
                <div class="hero-content text-center flex-col">
                    <div class="badge badge-success">{"New Wallpapers Daily"}</div>
                    <h1 class="text-4xl md:text-5xl font-bold">{"Premium Wallpapers for Your Devices"}</h1>
                    <p class="py-4 max-w-2xl opacity-80">
                        {"Discover and download beautiful, high-quality wallpapers for your phone, tablet, or desktop."}
                    </p>
                    <div class="flex gap-3">
                        <Link<Route> to={Route::Phone} classes="btn btn-primary">{"Phone Wallpapers"}</Link<Route>>
                        <Link<Route> to={Route::Desktop} classes="btn btn-secondary">{"Desktop Wallpapers"}</Link<Route>>
                    </div>
                </div>
            </div>
            <Featured />
        </>
    }
}

#[function_component(ComingSoon)]
pub(crate) fn coming_soon() -> Html {
    html! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center flex-col">
                <h1 class="text-4xl font-bold">{"Coming Soon"}</h1>
                <p class="opacity-70">{"This page is under construction. Check back later!"}</p>
                <Link<Route> to={Route::Home} classes="btn btn-primary">{"Back to Home"}</Link<Route>>
            </div>
        </div>
    }
}
