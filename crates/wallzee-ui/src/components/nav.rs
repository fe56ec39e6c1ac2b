use wallzee_core::DeviceType;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

use crate::routes::Route;
use crate::state::AppStore;

const DEVICE_LINKS: [(DeviceType, &str); 2] = [
    (DeviceType::Phone, "Phone"),
    (DeviceType::Desktop, "Desktop"),
];

#[function_component(Navbar)]
pub(crate) fn navbar() -> Html {
    let is_admin = use_selector(|store: &AppStore| store.session.is_admin());

    html! {
        <nav class="navbar bg-base-100 shadow-sm sticky top-0 z-40">
            <div class="flex-1">
                <Link<Route> to={Route::Home} classes="btn btn-ghost text-xl">{"Wallzee"}</Link<Route>>
            </div>
            <ul class="menu menu-horizontal px-1">
                <li><Link<Route> to={Route::Home}>{"Home"}</Link<Route>></li>
                {for DEVICE_LINKS.iter().map(|(device, label)| html! {
                    <li><Link<Route> to={Route::for_device(*device)}>{*label}</Link<Route>></li>
                })}
                if *is_admin {
                    <li>
                        <Link<Route> to={Route::AdminDashboard} classes="badge badge-primary">
                            {"Admin"}
                        </Link<Route>>
                    </li>
                }
            </ul>
        </nav>
    }
}

#[function_component(Footer)]
pub(crate) fn footer() -> Html {
    html! {
        <footer class="footer footer-center p-6 bg-base-200 text-base-content">
            <nav class="grid grid-flow-col gap-4">
                <Link<Route> to={Route::Phone}>{"Phone Wallpapers"}</Link<Route>>
                <Link<Route> to={Route::Desktop}>{"Desktop Wallpapers"}</Link<Route>>
            </nav>
            <p>{"© Wallzee. Free HD wallpapers for every screen."}</p>
        </footer>
    }
}
