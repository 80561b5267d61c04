use super::*;

#[component]
/// Shared text primitive.
pub fn Text(
    #[prop(default = TextRole::Body)] role: TextRole,
    #[prop(default = TextTone::Primary)] tone: TextTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <span
            class=merge_layout_class("ui-text", layout_class)
            data-ui-primitive="true"
            data-ui-kind="text"
            data-ui-slot=ui_slot
            data-ui-variant=role.token()
            data-ui-tone=tone.token()
        >
            {children()}
        </span>
    }
}

#[component]
/// Shared heading primitive.
pub fn Heading(
    #[prop(default = TextRole::Title)] role: TextRole,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <h2
            class=merge_layout_class("ui-heading", layout_class)
            data-ui-primitive="true"
            data-ui-kind="heading"
            data-ui-slot=ui_slot
            data-ui-variant=role.token()
        >
            {children()}
        </h2>
    }
}

#[component]
/// Compact status badge primitive.
pub fn Badge(
    #[prop(default = TextTone::Secondary)] tone: TextTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <span
            class=merge_layout_class("ui-badge", layout_class)
            data-ui-primitive="true"
            data-ui-kind="badge"
            data-ui-tone=tone.token()
        >
            {children()}
        </span>
    }
}

#[component]
/// Placeholder row spanning a whole table body.
pub fn EmptyState(
    #[prop(optional)] layout_class: Option<&'static str>,
    colspan: u8,
    children: Children,
) -> impl IntoView {
    view! {
        <tr
            class=merge_layout_class("ui-empty-state", layout_class)
            data-ui-primitive="true"
            data-ui-kind="empty-state"
        >
            <td colspan=colspan>{children()}</td>
        </tr>
    }
}

#[component]
/// Shared table primitive.
pub fn DataTable(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <table
            class=merge_layout_class("ui-data-table", layout_class)
            id=id
            aria-label=aria_label
            data-ui-primitive="true"
            data-ui-kind="data-table"
        >
            {children()}
        </table>
    }
}

#[component]
/// Embedded document frame; the host resets `src` to a blank target when the surface closes.
pub fn PreviewFrame(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(into)] src: MaybeSignal<String>,
    #[prop(optional, into)] title: MaybeSignal<String>,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-preview-frame", layout_class)
            data-ui-primitive="true"
            data-ui-kind="preview-frame"
        >
            <iframe src=move || src.get() title=move || title.get() data-ui-slot="frame"></iframe>
        </div>
    }
}
