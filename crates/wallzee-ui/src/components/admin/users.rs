use chrono::Utc;
use gloo::console;
use wallzee_core::UserProfile;
use wallzee_core::stats::user_stats;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::{error_banner, spinner};
use crate::app::use_api;

/// Read-only profile listing; label changes need a server key and go
/// through the command line.
#[function_component(UsersAdmin)]
pub(crate) fn users_admin() -> Html {
    let client = use_api();
    let users = use_state(|| None::<Vec<UserProfile>>);
    let error = use_state(|| None::<String>);

    {
        let users = users.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match client.list_users().await {
                        Ok(loaded) => users.set(Some(loaded)),
                        Err(err) => {
                            console::error!(format!("user load failed: {err}"));
                            error.set(Some("Failed to load users".into()));
                            users.set(Some(Vec::new()));
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    let body = match users.as_ref() {
        None => spinner(),
        Some(profiles) => {
            let stats = user_stats(profiles, Utc::now());
            html! {
                <>
                    <div class="stats shadow mb-6">
                        <div class="stat">
                            <div class="stat-title">{"Total Users"}</div>
                            <div class="stat-value">{stats.total}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">{"Admins"}</div>
                            <div class="stat-value text-primary">{stats.admins}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">{"New This Month"}</div>
                            <div class="stat-value">{stats.recent}</div>
                        </div>
                    </div>
                    <div class="overflow-x-auto">
                        <table class="table w-full">
                            <thead>
                                <tr>
                                    <th>{"Name"}</th>
                                    <th>{"Email"}</th>
                                    <th>{"Role"}</th>
                                    <th>{"Joined"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                {for profiles.iter().map(|profile| html! {
                                    <tr key={profile.id.clone()}>
                                        <td>{profile.name.clone()}</td>
                                        <td>{profile.email.clone()}</td>
                                        <td>
                                            if profile.is_admin {
                                                <span class="badge badge-primary">{"Admin"}</span>
                                            } else {
                                                <span class="badge badge-ghost">{"User"}</span>
                                            }
                                        </td>
                                        <td>{profile.created_at.format("%Y-%m-%d").to_string()}</td>
                                    </tr>
                                })}
                            </tbody>
                        </table>
                    </div>
                    <p class="text-sm opacity-60 mt-4">
                        {"Admin access is granted with the command line tool: wallzee user promote <id>"}
                    </p>
                </>
            }
        }
    };

    html! {
        <>
            <h1 class="text-3xl font-bold mb-6">{"Users"}</h1>
            {error_banner(error.as_ref())}
            {body}
        </>
    }
}
