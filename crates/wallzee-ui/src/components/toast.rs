use gloo::timers::callback::Timeout;
use yew::prelude::*;
use yewdux::prelude::Dispatch;

use crate::models::{Toast, ToastKind};
use crate::state::AppStore;

#[derive(Properties, PartialEq)]
pub(crate) struct ToastHostProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(ToastHost)]
pub(crate) fn toast_host(props: &ToastHostProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with_deps(
            move |list: &Vec<Toast>| {
                let handles: Vec<Timeout> = list
                    .iter()
                    .map(|toast| {
                        let on_dismiss = on_dismiss.clone();
                        let id = toast.id;
                        Timeout::new(toast.ttl_ms, move || on_dismiss.emit(id))
                    })
                    .collect();
                move || drop(handles)
            },
            props.toasts.clone(),
        );
    }

    html! {
        <div class="toast toast-end toast-bottom z-50" aria-live="polite" aria-atomic="true">
            {for props.toasts.iter().map(|toast| render_toast(toast, &props.on_dismiss))}
        </div>
    }
}

fn render_toast(toast: &Toast, on_dismiss: &Callback<u64>) -> Html {
    let id = toast.id;
    let on_close = {
        let on_dismiss = on_dismiss.clone();
        Callback::from(move |_| on_dismiss.emit(id))
    };

    html! {
        <div class={classes!("alert", format!("alert-{}", toast.kind.class()))} role="status">
            <span>{toast.message.clone()}</span>
            <button class="btn btn-ghost btn-xs" aria-label="Dismiss" onclick={on_close}>{"✕"}</button>
        </div>
    }
}

/// Queue download feedback.
pub(crate) fn notify_download(kind: ToastKind, message: impl Into<String>) {
    let message = message.into();
    Dispatch::<AppStore>::new().reduce_mut(move |store| {
        store.download_toast(kind, message);
    });
}

/// Queue admin form feedback.
pub(crate) fn notify_form(kind: ToastKind, message: impl Into<String>) {
    let message = message.into();
    Dispatch::<AppStore>::new().reduce_mut(move |store| {
        store.form_toast(kind, message);
    });
}
