use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::{Link, Redirect, use_navigator};
use yewdux::prelude::{Dispatch, use_selector};

use crate::app::use_api;
use crate::models::LoginForm;
use crate::routes::Route;
use crate::services::api::ApiError;
use crate::state::{AppStore, BAD_CREDENTIALS_MESSAGE, NOT_ADMIN_MESSAGE};

fn login_error(err: &ApiError) -> String {
    match err {
        ApiError::Validation(reason) => reason.to_string(),
        err if err.is_access_denied() => NOT_ADMIN_MESSAGE.to_string(),
        _ => BAD_CREDENTIALS_MESSAGE.to_string(),
    }
}

#[function_component(LoginPage)]
pub(crate) fn login_page() -> Html {
    let client = use_api();
    let navigator = use_navigator();
    let is_admin = use_selector(|store: &AppStore| store.session.is_admin());
    let form = use_state(LoginForm::default);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);

    if *is_admin {
        return html! { <Redirect<Route> to={Route::AdminDashboard} /> };
    }

    let on_email = {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                next.email = input.value();
                form.set(next);
            }
        })
    };
    let on_password = {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                next.password = input.value();
                form.set(next);
            }
        })
    };
    let on_submit = {
        let form = form.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let current = (*form).clone();
            if let Err(reason) = current.validate() {
                error.set(Some(reason.to_string()));
                return;
            }
            error.set(None);
            busy.set(true);
            let client = client.clone();
            let error = error.clone();
            let busy = busy.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                match client.login(&current.email, &current.password).await {
                    Ok(user) => {
                        Dispatch::<AppStore>::new()
                            .reduce_mut(move |store| store.set_session(Some(user)));
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::AdminDashboard);
                        }
                    }
                    Err(err) => {
                        Dispatch::<AppStore>::new().reduce_mut(AppStore::sign_out);
                        error.set(Some(login_error(&err)));
                    }
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-base-200">
            <div class="card w-full max-w-sm shadow-2xl bg-base-100">
                <form class="card-body" onsubmit={on_submit}>
                    <h1 class="text-2xl font-bold text-center">{"Admin Login"}</h1>
                    if let Some(message) = (*error).clone() {
                        <div class="alert alert-error"><span>{message}</span></div>
                    }
                    <label class="form-control">
                        <span class="label-text">{"Email"}</span>
                        <input class="input input-bordered" type="email" autocomplete="username"
                            value={form.email.clone()} oninput={on_email} />
                    </label>
                    <label class="form-control">
                        <span class="label-text">{"Password"}</span>
                        <input class="input input-bordered" type="password" autocomplete="current-password"
                            value={form.password.clone()} oninput={on_password} />
                    </label>
                    <button class="btn btn-primary mt-4" type="submit" disabled={*busy}>
                        if *busy {
                            <span class="loading loading-spinner"></span>
                        }
                        {"Login"}
                    </button>
                    <Link<Route> to={Route::Home} classes="link text-center text-sm">{"Back to site"}</Link<Route>>
                </form>
            </div>
        </div>
    }
}
