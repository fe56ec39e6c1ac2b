use wallzee_core::session::RouteAccess;
use yew::prelude::*;
use yew_router::prelude::Redirect;
use yewdux::prelude::use_selector;

use crate::routes::Route;
use crate::state::AppStore;

#[derive(Properties, PartialEq)]
pub(crate) struct AdminGuardProps {
    #[prop_or_default]
    pub children: Children,
}

/// Renders its children only for a signed-in admin.
#[function_component(AdminGuard)]
pub(crate) fn admin_guard(props: &AdminGuardProps) -> Html {
    let session = use_selector(|store: &AppStore| store.session.clone());
    match session.admin_route_access() {
        RouteAccess::Wait => html! {
            <div class="flex justify-center items-center h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        },
        RouteAccess::RedirectToLogin => html! { <Redirect<Route> to={Route::AdminLogin} /> },
        RouteAccess::Forbidden => html! { <Redirect<Route> to={Route::Home} /> },
        RouteAccess::Allowed => html! { <>{for props.children.iter()}</> },
    }
}
