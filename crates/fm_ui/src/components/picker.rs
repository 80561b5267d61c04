use fm_runtime::{DestinationOption, DestinationPicker};
use leptos::*;

use crate::primitives::SelectField;

const LOADING_OPTION_LABEL: &str = "Loading folders…";

/// Option text with the tree indentation preserved; collapsible spaces would flatten it.
fn option_label(option: &DestinationOption) -> String {
    option.label.replace(' ', "\u{a0}")
}

#[component]
/// Destination `<select>` fed by a [`DestinationPicker`]; disabled while its tree is loading.
pub(super) fn DestinationSelect(
    #[prop(into)] id: String,
    #[prop(into)] picker: Signal<DestinationPicker>,
    on_select: Callback<String>,
) -> impl IntoView {
    let loading = Signal::derive(move || picker.with(|picker| picker.loading));
    let selected = Signal::derive(move || picker.with(|picker| picker.selected.clone()));

    view! {
        <SelectField
            id=id
            layout_class="fm-destination-select"
            aria_label="Destination folder"
            value=selected
            disabled=loading
            on_change=on_select
        >
            {move || {
                if loading.get() {
                    return view! { <option value="">{LOADING_OPTION_LABEL}</option> }
                        .into_view();
                }
                // Options render after the select's value prop, so each marks its own selection.
                let current = selected.get();
                picker
                    .with(|picker| picker.options.clone())
                    .into_iter()
                    .map(|option| {
                        let label = option_label(&option);
                        let is_selected = option.value == current;
                        view! {
                            <option
                                value=option.value
                                selected=is_selected
                                data-depth=option.depth
                            >
                                {label}
                            </option>
                        }
                    })
                    .collect_view()
            }}
        </SelectField>
    }
}
