//! Application shell: router, session bootstrap, and toast host.

use gloo::console;
use wallzee_config::WallzeeConfig;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

use crate::components::admin::{
    AdminLayout, CategoriesAdmin, Dashboard, SettingsAdmin, UsersAdmin, WallpapersAdmin,
};
use crate::components::gallery::{ComingSoon, GalleryPage, HomePage};
use crate::components::guard::AdminGuard;
use crate::components::login::LoginPage;
use crate::components::nav::{Footer, Navbar};
use crate::components::toast::ToastHost;
use crate::routes::Route;
use crate::state::AppStore;

pub(crate) mod api;
pub(crate) mod head;

pub(crate) use api::{ApiCtx, use_api};

#[derive(Properties, PartialEq)]
pub(crate) struct AppProps {
    pub api: ApiCtx,
}

#[function_component(App)]
pub(crate) fn app(props: &AppProps) -> Html {
    let dispatch = Dispatch::<AppStore>::new();
    let toasts = use_selector(|store: &AppStore| store.toasts.items().to_vec());

    {
        let client = props.api.client.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    let user = client.current_user().await;
                    dispatch.reduce_mut(|store| store.set_session(user));
                });
                || ()
            },
            (),
        );
    }

    let on_dismiss = Callback::from(move |id: u64| dispatch.reduce_mut(|store| store.dismiss_toast(id)));

    html! {
        <ContextProvider<ApiCtx> context={props.api.clone()}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
            <ToastHost toasts={(*toasts).clone()} {on_dismiss} />
        </ContextProvider<ApiCtx>>
    }
}

fn switch(route: Route) -> Html {
    head::apply_meta(&route.meta());
    if !matches!(route, Route::Home | Route::Phone | Route::Desktop) {
        head::apply_schema(None);
    }

    let page = match route.clone() {
        Route::Home => html! { <HomePage /> },
        Route::Phone | Route::Desktop => match route.device() {
            Some(device) => html! { <GalleryPage {device} /> },
            None => html! { <ComingSoon /> },
        },
        Route::AdminLogin => html! { <LoginPage /> },
        Route::AdminDashboard => html! { <Dashboard /> },
        Route::AdminWallpapers => html! { <WallpapersAdmin /> },
        Route::AdminCategories => html! { <CategoriesAdmin /> },
        Route::AdminUsers => html! { <UsersAdmin /> },
        Route::AdminSettings => html! { <SettingsAdmin /> },
        Route::NotFound => html! { <ComingSoon /> },
    };

    if route.is_protected() {
        html! {
            <AdminGuard>
                <AdminLayout active={route}>{page}</AdminLayout>
            </AdminGuard>
        }
    } else if route.has_public_chrome() {
        html! {
            <>
                <Navbar />
                <main class="min-h-screen">{page}</main>
                <Footer />
            </>
        }
    } else {
        page
    }
}

/// Entry point used by the wasm binary.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let config = crate::config::load().unwrap_or_else(|err| {
        console::error!(format!("invalid build configuration, using defaults: {err}"));
        WallzeeConfig::default()
    });
    let props = AppProps {
        api: ApiCtx::new(&config),
    };
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<App>::with_root_and_props(root, props).render();
    } else {
        yew::Renderer::<App>::with_props(props).render();
    }
}
