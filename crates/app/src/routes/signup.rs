use std::time::Duration;

use backend_client::{BackendClient, OrderDirection};
use dioxus::prelude::*;
use shared_types::{Center, SignupRequest, UserRole};

use crate::routes::Route;

const ROLE_OPTIONS: [UserRole; 3] = [UserRole::Public, UserRole::Staff, UserRole::DistrictAdmin];

const DESIGNATION_OPTIONS: [(&str, &str); 11] = [
    ("Medical Officer", "Medical Officer"),
    ("Staff Nurse", "Staff Nurse"),
    ("ANM", "ANM (Auxiliary Nurse Midwife)"),
    ("Pharmacist", "Pharmacist"),
    ("Lab Technician", "Lab Technician"),
    ("Radiographer", "Radiographer"),
    ("Biomedical Engineer", "Biomedical Engineer"),
    ("Maintenance Technician", "Maintenance Technician"),
    ("Administrator", "Administrator"),
    ("District Health Officer", "District Health Officer"),
    ("Other", "Other"),
];

const DEPARTMENT_OPTIONS: [&str; 11] = [
    "General Medicine",
    "Pediatrics",
    "Obstetrics & Gynecology",
    "Surgery",
    "Emergency",
    "Laboratory",
    "Radiology",
    "Pharmacy",
    "Biomedical Engineering",
    "Administration",
    "Other",
];

/// Registration form. Staff and district-admin signups expose the
/// employment fields and a health-center dropdown fed from the `centers`
/// table; profile data travels as auth metadata for the backend to
/// materialize into a `users` row.
#[component]
pub fn SignupPage() -> Element {
    let client = use_context::<BackendClient>();
    let mut form = use_signal(SignupRequest::default);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut success_msg = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // A fetch failure leaves the dropdown empty rather than blocking signup.
    let centers_client = client.clone();
    let centers = use_resource(move || {
        let client = centers_client.clone();
        async move {
            client
                .from("centers")
                .select("id,name,type,district")
                .eq("is_active", "true")
                .order("district", OrderDirection::Ascending)
                .order("name", OrderDirection::Ascending)
                .execute::<Center>()
                .await
                .inspect_err(|err| {
                    tracing::warn!(error = %err.message, "failed to load centers");
                })
                .unwrap_or_default()
        }
    });

    let handle_signup = move |evt: FormEvent| {
        let client = client.clone();
        async move {
            evt.prevent_default();
            error_msg.set(None);
            success_msg.set(None);

            let request = form();
            if let Err(err) = request.validate_form() {
                error_msg.set(Some(err.summary()));
                return;
            }

            loading.set(true);
            match client.sign_up(&request).await {
                Ok(_) => {
                    success_msg.set(Some(
                        "Account created successfully! Please check your email for verification."
                            .to_string(),
                    ));
                    form.set(SignupRequest::default());
                    loading.set(false);
                    sleep(Duration::from_secs(3)).await;
                    navigator().push(Route::Login { redirect: None });
                }
                Err(err) => {
                    error_msg.set(Some(err.summary()));
                    loading.set(false);
                }
            }
        }
    };

    let staff_role = matches!(
        UserRole::parse(&form.read().role),
        Some(role) if role.requires_employment_details()
    );
    let center_required = form.read().role == "staff";

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card auth-card-wide",
                div { class: "auth-card-header",
                    h2 { "Create your account" }
                    p { "Rural Health Equipment Management System" }
                    p { class: "auth-link",
                        "Or "
                        Link { to: Route::Login { redirect: None }, "sign in to your existing account" }
                    }
                }

                if let Some(err) = error_msg() {
                    div { class: "auth-error", "{err}" }
                }
                if let Some(msg) = success_msg() {
                    div { class: "auth-success", "{msg}" }
                }

                form { onsubmit: handle_signup,
                    div { class: "auth-field",
                        label { r#for: "full_name", "Full Name *" }
                        input {
                            r#type: "text",
                            id: "full_name",
                            placeholder: "Enter your full name",
                            value: form.read().full_name.clone(),
                            oninput: move |e: FormEvent| form.write().full_name = e.value(),
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "email", "Email Address *" }
                        input {
                            r#type: "email",
                            id: "email",
                            placeholder: "Enter your email address",
                            value: form.read().email.clone(),
                            oninput: move |e: FormEvent| form.write().email = e.value(),
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "phone", "Phone Number" }
                        input {
                            r#type: "tel",
                            id: "phone",
                            placeholder: "Enter your phone number",
                            value: form.read().phone.clone(),
                            oninput: move |e: FormEvent| form.write().phone = e.value(),
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "password", "Password *" }
                        input {
                            r#type: "password",
                            id: "password",
                            placeholder: "Enter your password",
                            value: form.read().password.clone(),
                            oninput: move |e: FormEvent| form.write().password = e.value(),
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "confirm_password", "Confirm Password *" }
                        input {
                            r#type: "password",
                            id: "confirm_password",
                            placeholder: "Confirm your password",
                            value: form.read().confirm_password.clone(),
                            oninput: move |e: FormEvent| form.write().confirm_password = e.value(),
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "role", "Role *" }
                        select {
                            id: "role",
                            value: form.read().role.clone(),
                            oninput: move |e: FormEvent| form.write().role = e.value(),
                            option { value: "", "Select your role" }
                            for role in ROLE_OPTIONS {
                                option { value: "{role.as_str()}", "{role.display_name()}" }
                            }
                        }
                    }

                    if staff_role {
                        div { class: "auth-field",
                            label { r#for: "center_id",
                                if center_required { "Health Center *" } else { "Health Center (Optional)" }
                            }
                            select {
                                id: "center_id",
                                value: form.read().center_id.clone(),
                                oninput: move |e: FormEvent| form.write().center_id = e.value(),
                                option { value: "", "Select a health center" }
                                for center in centers().unwrap_or_default() {
                                    option { value: "{center.id}", "{center.label()}" }
                                }
                            }
                        }
                        div { class: "auth-field",
                            label { r#for: "employee_id", "Employee ID *" }
                            input {
                                r#type: "text",
                                id: "employee_id",
                                placeholder: "Enter your employee ID",
                                value: form.read().employee_id.clone(),
                                oninput: move |e: FormEvent| form.write().employee_id = e.value(),
                            }
                        }
                        div { class: "auth-field",
                            label { r#for: "designation", "Designation *" }
                            select {
                                id: "designation",
                                value: form.read().designation.clone(),
                                oninput: move |e: FormEvent| form.write().designation = e.value(),
                                option { value: "", "Select your designation" }
                                for (value, label) in DESIGNATION_OPTIONS {
                                    option { value: "{value}", "{label}" }
                                }
                            }
                        }
                        div { class: "auth-field",
                            label { r#for: "department", "Department" }
                            select {
                                id: "department",
                                value: form.read().department.clone(),
                                oninput: move |e: FormEvent| form.write().department = e.value(),
                                option { value: "", "Select department (optional)" }
                                for department in DEPARTMENT_OPTIONS {
                                    option { value: "{department}", "{department}" }
                                }
                            }
                        }
                    }

                    button {
                        r#type: "submit",
                        class: "auth-submit",
                        disabled: loading(),
                        if loading() { "Creating Account..." } else { "Sign Up" }
                    }
                }

                div { class: "auth-footnote",
                    p { "* Required fields" }
                    p {
                        "By signing up, you agree to the terms and conditions of the Rural Health Equipment Management System."
                    }
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}
