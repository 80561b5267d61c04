use super::*;

#[component]
/// Shared button primitive with standardized states.
pub fn Button(
    #[prop(default = ButtonVariant::Standard)] variant: ButtonVariant,
    #[prop(default = ButtonSize::Md)] size: ButtonSize,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] button_type: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional, into)] title: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] busy: MaybeSignal<bool>,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            type=button_type.unwrap_or("button")
            class=merge_layout_class("ui-button", layout_class)
            id=id
            aria-label=move || aria_label.get()
            aria-busy=move || bool_token(busy.get())
            title=move || title.get()
            disabled=move || disabled.get() || busy.get()
            data-ui-primitive="true"
            data-ui-kind="button"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-size=size.token()
            data-ui-state=move || if busy.get() { "busy" } else { "idle" }
            data-ui-disabled=move || bool_token(disabled.get())
            on:click=move |ev| {
                if let Some(on_click) = on_click.as_ref() {
                    on_click.call(ev);
                }
            }
        >
            {children()}
        </button>
    }
}

#[component]
/// Shared text input primitive.
pub fn TextField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] autocomplete: Option<&'static str>,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_input: Option<Callback<String>>,
    #[prop(optional)] on_keydown: Option<Callback<KeyboardEvent>>,
) -> impl IntoView {
    view! {
        <input
            class=merge_layout_class("ui-field", layout_class)
            id=id
            placeholder=placeholder
            aria-label=aria_label
            autocomplete=autocomplete
            type=input_type.unwrap_or("text")
            prop:value=move || value.get()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="text-field"
            data-ui-slot=ui_slot
            data-ui-disabled=move || bool_token(disabled.get())
            on:input=move |ev| {
                if let Some(on_input) = on_input.as_ref() {
                    on_input.call(event_target_value(&ev));
                }
            }
            on:keydown=move |ev| {
                if let Some(on_keydown) = on_keydown.as_ref() {
                    on_keydown.call(ev);
                }
            }
        />
    }
}

#[component]
/// Shared select-field primitive; `on_change` receives the selected option value.
pub fn SelectField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_change: Option<Callback<String>>,
    children: Children,
) -> impl IntoView {
    view! {
        <select
            class=merge_layout_class("ui-field", layout_class)
            id=id
            aria-label=aria_label
            prop:value=move || value.get()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="select"
            data-ui-slot=ui_slot
            data-ui-disabled=move || bool_token(disabled.get())
            on:change=move |ev| {
                if let Some(on_change) = on_change.as_ref() {
                    on_change.call(event_target_value(&ev));
                }
            }
        >
            {children()}
        </select>
    }
}

#[component]
/// Shared checkbox input; `on_change` receives the new checked state.
pub fn CheckboxField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional, into)] checked: MaybeSignal<bool>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_change: Option<Callback<bool>>,
) -> impl IntoView {
    view! {
        <input
            class=merge_layout_class("ui-checkbox", layout_class)
            type="checkbox"
            id=id
            aria-label=move || aria_label.get()
            prop:checked=move || checked.get()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="checkbox"
            data-ui-selected=move || bool_token(checked.get())
            on:change=move |ev| {
                if let Some(on_change) = on_change.as_ref() {
                    on_change.call(event_target_checked(&ev));
                }
            }
        />
    }
}

#[component]
/// Shared switch with explicit `role="switch"` semantics.
pub fn Switch(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] checked: MaybeSignal<bool>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_toggle: Option<Callback<bool>>,
) -> impl IntoView {
    let handle_toggle = move || {
        if disabled.get_untracked() {
            return;
        }
        if let Some(on_toggle) = on_toggle.as_ref() {
            on_toggle.call(!checked.get_untracked());
        }
    };

    view! {
        <button
            type="button"
            class=merge_layout_class("ui-switch", layout_class)
            id=id
            role="switch"
            aria-label=move || aria_label.get()
            aria-checked=move || checked.get().to_string()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="switch"
            data-ui-slot=ui_slot
            data-ui-selected=move || bool_token(checked.get())
            data-ui-disabled=move || bool_token(disabled.get())
            on:click=move |_| handle_toggle()
            on:keydown=move |ev| match ev.key().as_str() {
                " " | "Enter" => {
                    ev.prevent_default();
                    handle_toggle();
                }
                _ => {}
            }
        >
            <span data-ui-slot="track">
                <span data-ui-slot="thumb"></span>
            </span>
        </button>
    }
}

#[component]
/// Multi-file picker; `on_change` receives the raw change event so the host can read the files.
pub fn FileField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] node_ref: NodeRef<html::Input>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_change: Option<Callback<web_sys::Event>>,
) -> impl IntoView {
    view! {
        <input
            class=merge_layout_class("ui-file-field", layout_class)
            type="file"
            multiple=true
            id=id
            aria-label=aria_label
            node_ref=node_ref
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="file-field"
            on:change=move |ev| {
                if let Some(on_change) = on_change.as_ref() {
                    on_change.call(ev);
                }
            }
        />
    }
}

#[component]
/// Shared linear progress indicator with a percentage label.
pub fn ProgressBar(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(into)] value: MaybeSignal<u8>,
) -> impl IntoView {
    let capped = move || value.get().min(100);

    view! {
        <div
            class=merge_layout_class("ui-progress", layout_class)
            role="progressbar"
            aria-valuemin="0"
            aria-valuemax="100"
            aria-valuenow=capped
            data-ui-primitive="true"
            data-ui-kind="progress"
            data-ui-slot=ui_slot
            data-ui-value=capped
        >
            <div data-ui-slot="bar" style=move || format!("width:{}%;", capped())>
                {move || format!("{}%", capped())}
            </div>
        </div>
    }
}
