use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::use_navigator;
use yewdux::prelude::{Dispatch, use_selector};

use super::error_banner;
use crate::app::use_api;
use crate::components::toast::notify_form;
use crate::models::{PasswordForm, ToastKind};
use crate::routes::Route;
use crate::services::api::ApiError;
use crate::state::{AppStore, PASSWORD_FAILED_MESSAGE};

fn password_field(
    form: &UseStateHandle<PasswordForm>,
    apply: fn(&mut PasswordForm, String),
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

#[function_component(SettingsAdmin)]
pub(crate) fn settings_admin() -> Html {
    let client = use_api();
    let navigator = use_navigator();
    let account = use_selector(|store: &AppStore| store.session.user().cloned());
    let form = use_state(PasswordForm::default);
    let error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let on_current = password_field(&form, |form, value| form.current = value);
    let on_new = password_field(&form, |form, value| form.new = value);
    let on_confirm = password_field(&form, |form, value| form.confirm = value);

    let on_submit = {
        let client = client.clone();
        let navigator = navigator.clone();
        let form = form.clone();
        let error = error.clone();
        let saving = saving.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let current = (*form).clone();
            if let Err(reason) = current.validate() {
                error.set(Some(reason.to_string()));
                return;
            }
            error.set(None);
            saving.set(true);
            let client = client.clone();
            let navigator = navigator.clone();
            let form = form.clone();
            let error = error.clone();
            let saving = saving.clone();
            spawn_local(async move {
                let result = client
                    .update_password(&current.current, &current.new, &current.confirm)
                    .await;
                saving.set(false);
                match result {
                    Ok(()) => {
                        form.set(PasswordForm::default());
                        notify_form(ToastKind::Success, "Password updated successfully");
                    }
                    Err(ApiError::Validation(reason)) => error.set(Some(reason.to_string())),
                    Err(_) => {
                        notify_form(ToastKind::Error, PASSWORD_FAILED_MESSAGE);
                        Dispatch::<AppStore>::new().reduce_mut(AppStore::sign_out);
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::AdminLogin);
                        }
                    }
                }
            });
        })
    };
    let on_logout = Callback::from(move |_: MouseEvent| {
        let client = client.clone();
        let navigator = navigator.clone();
        spawn_local(async move {
            client.logout().await;
            Dispatch::<AppStore>::new().reduce_mut(AppStore::sign_out);
            if let Some(navigator) = navigator {
                navigator.push(&Route::AdminLogin);
            }
        });
    });

    html! {
        <>
            <h1 class="text-3xl font-bold mb-6">{"Settings"}</h1>
            if let Some(user) = (*account).clone() {
                <div class="card bg-base-100 shadow-md mb-8">
                    <div class="card-body">
                        <h2 class="card-title">{"Account"}</h2>
                        <p>{format!("{} <{}>", user.name, user.email)}</p>
                    </div>
                </div>
            }
            <form class="card bg-base-100 shadow-md mb-8 max-w-lg" onsubmit={on_submit}>
                <div class="card-body">
                    <h2 class="card-title">{"Change Password"}</h2>
                    {error_banner(error.as_ref())}
                    <label class="form-control">
                        <span class="label-text">{"Current Password"}</span>
                        <input class="input input-bordered" type="password" autocomplete="current-password"
                            value={form.current.clone()} oninput={on_current} />
                    </label>
                    <label class="form-control">
                        <span class="label-text">{"New Password"}</span>
                        <input class="input input-bordered" type="password" autocomplete="new-password"
                            value={form.new.clone()} oninput={on_new} />
                    </label>
                    <label class="form-control">
                        <span class="label-text">{"Confirm New Password"}</span>
                        <input class="input input-bordered" type="password" autocomplete="new-password"
                            value={form.confirm.clone()} oninput={on_confirm} />
                    </label>
                    <button class="btn btn-primary mt-4" type="submit" disabled={*saving}>
                        {if *saving { "Updating..." } else { "Update Password" }}
                    </button>
                </div>
            </form>
            <button class="btn btn-outline btn-error" onclick={on_logout}>{"Logout"}</button>
        </>
    }
}
