use fm_runtime::Alert;

use super::*;

#[component]
/// Shared modal dialog with a backdrop; Escape and backdrop clicks call `on_dismiss`.
pub fn Modal(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(into)] open: MaybeSignal<bool>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
    children: ChildrenFn,
) -> impl IntoView {
    let dismiss = move || {
        if let Some(on_dismiss) = on_dismiss.as_ref() {
            on_dismiss.call(());
        }
    };

    view! {
        <Show when=move || open.get() fallback=|| ()>
            <div
                class="ui-modal-backdrop"
                data-ui-primitive="true"
                data-ui-kind="modal-backdrop"
                on:click=move |_| dismiss()
            >
                <div
                    class=merge_layout_class("ui-modal", layout_class)
                    id=id.clone()
                    role="dialog"
                    aria-modal="true"
                    aria-label=aria_label.clone()
                    data-ui-primitive="true"
                    data-ui-kind="modal"
                    on:click=|ev: MouseEvent| ev.stop_propagation()
                    on:keydown=move |ev: KeyboardEvent| {
                        if ev.key() == "Escape" {
                            ev.prevent_default();
                            dismiss();
                        }
                    }
                >
                    {children()}
                </div>
            </div>
        </Show>
    }
}

#[component]
/// Dismissible status banner for the page's single alert slot.
pub fn AlertBanner(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(into)] alert: Signal<Option<Alert>>,
    on_dismiss: Callback<()>,
) -> impl IntoView {
    view! {
        <div class=merge_layout_class("ui-alert-region", layout_class) aria-live="polite">
            {move || {
                alert
                    .get()
                    .map(|alert| {
                        view! {
                            <div
                                class="ui-alert"
                                role="alert"
                                data-ui-primitive="true"
                                data-ui-kind="alert"
                                data-ui-variant=alert.category.token()
                                data-alert-id=alert.id.0
                            >
                                <span data-ui-slot="message">{alert.message}</span>
                                <button
                                    type="button"
                                    class="ui-alert-close"
                                    aria-label="Close"
                                    data-ui-slot="dismiss"
                                    on:click=move |_| on_dismiss.call(())
                                >
                                    "×"
                                </button>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
