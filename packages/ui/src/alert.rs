//! Demo credentials notice shown on the sign-in page.

use dioxus::prelude::*;

pub const DEMO_USERNAME: &str = "akshpatel9363@gmail.com";
pub const DEMO_PASSWORD: &str = "123456";

#[component]
pub fn Alert() -> Element {
    rsx! {
        div {
            class: "rounded-md bg-yellow-50 p-4",
            div {
                class: "flex",
                div {
                    class: "ml-3",
                    h3 {
                        class: "text-sm font-medium text-yellow-800",
                        "Login Credential"
                    }
                    div {
                        class: "mt-2 text-sm text-yellow-700",
                        p { "Username: {DEMO_USERNAME}" }
                        p { "Password: {DEMO_PASSWORD}" }
                    }
                }
            }
        }
    }
}
