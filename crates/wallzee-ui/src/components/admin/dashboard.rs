use chrono::Utc;
use gloo::console;
use wallzee_core::DashboardStats;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;

use super::{error_banner, spinner};
use crate::app::use_api;
use crate::models::percent_of;
use crate::routes::Route;

#[function_component(Dashboard)]
pub(crate) fn dashboard() -> Html {
    let client = use_api();
    let stats = use_state(|| None::<DashboardStats>);
    let error = use_state(|| None::<String>);

    {
        let stats = stats.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match client.dashboard_stats(Utc::now()).await {
                        Ok(loaded) => stats.set(Some(loaded)),
                        Err(err) => {
                            console::error!(format!("dashboard load failed: {err}"));
                            error.set(Some("Failed to load dashboard statistics".into()));
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    let body = match *stats {
        None if error.is_none() => spinner(),
        None => Html::default(),
        Some(stats) => {
            let cards = [
                ("Total Wallpapers", stats.total.to_string(), format!("{} new in last month", stats.recent)),
                (
                    "Phone Wallpapers",
                    stats.by_device.phone.to_string(),
                    format!("{}% of total", percent_of(stats.by_device.phone, stats.total)),
                ),
                (
                    "Desktop Wallpapers",
                    stats.by_device.desktop.to_string(),
                    format!("{}% of total", percent_of(stats.by_device.desktop, stats.total)),
                ),
                ("Total Downloads", stats.total_downloads.to_string(), "User engagement metric".to_string()),
            ];
            html! {
                <>
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6">
                        {for cards.into_iter().map(|(title, value, desc)| html! {
                            <div class="stat bg-base-100 shadow-md rounded-lg">
                                <div class="stat-title">{title}</div>
                                <div class="stat-value text-primary">{value}</div>
                                <div class="stat-desc">{desc}</div>
                            </div>
                        })}
                    </div>
                    if stats.total == 0 {
                        <div class="text-center py-8">
                            <p class="opacity-70">{"No wallpapers have been uploaded yet."}</p>
                            <Link<Route> to={Route::AdminWallpapers} classes="btn btn-primary mt-4">
                                {"Upload Your First Wallpaper"}
                            </Link<Route>>
                        </div>
                    }
                </>
            }
        }
    };

    html! {
        <>
            <h1 class="text-3xl font-bold mb-6">{"Dashboard"}</h1>
            {error_banner(error.as_ref())}
            {body}
        </>
    }
}
