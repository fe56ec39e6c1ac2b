//! Admin panel: layout, dashboard, and management pages.

use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::{Link, use_navigator};
use yewdux::prelude::Dispatch;

use crate::app::use_api;
use crate::routes::Route;
use crate::state::AppStore;

mod categories;
mod dashboard;
mod settings;
mod users;
mod wallpapers;

pub(crate) use categories::CategoriesAdmin;
pub(crate) use dashboard::Dashboard;
pub(crate) use settings::SettingsAdmin;
pub(crate) use users::UsersAdmin;
pub(crate) use wallpapers::WallpapersAdmin;

const SECTIONS: [(Route, &str); 5] = [
    (Route::AdminDashboard, "Dashboard"),
    (Route::AdminWallpapers, "Wallpapers"),
    (Route::AdminCategories, "Categories"),
    (Route::AdminUsers, "Users"),
    (Route::AdminSettings, "Settings"),
];

#[derive(Properties, PartialEq)]
pub(crate) struct AdminLayoutProps {
    pub active: Route,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(AdminLayout)]
pub(crate) fn admin_layout(props: &AdminLayoutProps) -> Html {
    let client = use_api();
    let navigator = use_navigator();
    let on_logout = Callback::from(move |_: MouseEvent| {
        let client = client.clone();
        let navigator = navigator.clone();
        spawn_local(async move {
            client.logout().await;
            Dispatch::<AppStore>::new().reduce_mut(AppStore::sign_out);
            if let Some(navigator) = navigator {
                navigator.push(&Route::Home);
            }
        });
    });

    html! {
        <div class="min-h-screen flex bg-base-200">
            <aside class="w-64 bg-base-100 shadow-md hidden md:block">
                <div class="p-4 text-xl font-bold">
                    <Link<Route> to={Route::Home}>{"Wallzee Admin"}</Link<Route>>
                </div>
                <ul class="menu p-2">
                    {for SECTIONS.iter().map(|(route, label)| {
                        let class = classes!((*route == props.active).then_some("active"));
                        html! {
                            <li><Link<Route> to={route.clone()} classes={class}>{*label}</Link<Route>></li>
                        }
                    })}
                </ul>
                <div class="p-4 flex flex-col gap-2">
                    <Link<Route> to={Route::Home} classes="btn btn-ghost btn-sm">{"Back to site"}</Link<Route>>
                    <button class="btn btn-outline btn-error btn-sm" onclick={on_logout}>{"Logout"}</button>
                </div>
            </aside>
            <main class="flex-1 p-8">{for props.children.iter()}</main>
        </div>
    }
}

/// Spinner shown while a page loads.
pub(crate) fn spinner() -> Html {
    html! {
        <div class="flex justify-center items-center h-64">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// Inline error banner.
pub(crate) fn error_banner(message: Option<&String>) -> Html {
    message.map_or_else(Html::default, |message| {
        html! { <div class="alert alert-error mb-4"><span>{message.clone()}</span></div> }
    })
}
