use backend_client::BackendClient;
use dioxus::prelude::*;

use crate::routes::Route;

/// Signs the user out and returns to the entry view. Sign-out never fails
/// from the caller's perspective; the local session is already cleared by
/// the time the backend call resolves.
#[component]
pub fn LogoutButton() -> Element {
    let client = use_context::<BackendClient>();
    let mut busy = use_signal(|| false);

    rsx! {
        button {
            class: "logout-button",
            disabled: busy(),
            onclick: move |_| {
                let client = client.clone();
                busy.set(true);
                spawn(async move {
                    let _ = client.sign_out().await;
                    navigator().replace(Route::Login { redirect: None });
                });
            },
            if busy() { "Signing out..." } else { "Logout" }
        }
    }
}
