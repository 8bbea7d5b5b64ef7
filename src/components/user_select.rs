/// Sidebar selector: lists known evaluators and opens a session for the chosen one.
use leptos::*;
use wasm_bindgen_futures::spawn_local;
use crate::client;
use crate::models::wire::SessionView;

#[component]
pub fn UserSelect(on_session: Callback<SessionView>) -> impl IntoView {
    let (users, set_users) = create_signal(Vec::<String>::new());
    let (error, set_error) = create_signal(None::<String>);

    // Effects only run in the browser, so the list is fetched after hydration.
    create_effect(move |_| {
        spawn_local(async move {
            match client::fetch_users().await {
                Ok(list) => set_users.set(list),
                Err(err) => set_error.set(Some(err.to_string())),
            }
        });
    });

    let select_user = move |ev: web_sys::Event| {
        let user_id = event_target_value(&ev);
        if user_id.is_empty() {
            return;
        }
        spawn_local(async move {
            match client::start_session(&user_id).await {
                Ok(view) => {
                    set_error.set(None);
                    on_session.call(view);
                }
                Err(err) => set_error.set(Some(err.to_string())),
            }
        });
    };

    view! {
        <div class="user-select">
            <h2>{ "👤 Annotator Selection" }</h2>
            <label for="user-select">{ "Select your username:" }</label>
            <select id="user-select" on:change=select_user>
                <option value="">{ "--- Select User ---" }</option>
                <For
                    each=move || users.get()
                    key=|user| user.clone()
                    children=move |user: String| {
                        view! { <option value=user.clone()>{ user }</option> }
                    }
                />
            </select>
            {move || error.get().map(|message| view! { <p class="error">{ message }</p> })}
        </div>
    }
}
